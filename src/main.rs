//! Bank API server
//!
//! ```text
//! bank_api [--env <name>] [--port <n>]
//! ```
//!
//! Loads `config/<env>.yaml`, connects to PostgreSQL, creates missing tables
//! and serves the HTTP gateway.

use std::sync::Arc;

use anyhow::{Context, Result};

use bank_api::auth::JwtMaker;
use bank_api::config::AppConfig;
use bank_api::db::Database;
use bank_api::gateway::{self, state::AppState};
use bank_api::store::PgStore;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = bank_api::logging::init_logging(&app_config);

    tracing::info!(
        env = %env,
        version = env!("GIT_HASH"),
        "Starting Bank API"
    );

    let db = Database::connect(&app_config.postgres_url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    db.init_schema()
        .await
        .context("Failed to initialize schema")?;
    let db = Arc::new(db);

    let store = Arc::new(PgStore::new(db.pool().clone()));
    let jwt = Arc::new(JwtMaker::new(&app_config.token).context("Invalid token settings")?);
    let state = AppState::new(store, jwt, app_config.account.starting_balance).with_database(db);

    gateway::run_server(&app_config.gateway, Arc::new(state)).await
}
