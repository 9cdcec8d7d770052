use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Minimum length of the HS256 signing key in bytes
pub const MIN_SYMMETRIC_KEY_LEN: usize = 32;

/// Upper bound for either token lifetime (ten years)
pub const MAX_TOKEN_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: LogRotation,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL
    pub postgres_url: String,
    pub token: TokenConfig,
    #[serde(default)]
    pub account: AccountConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenConfig {
    pub symmetric_key: String,
    #[serde(default = "default_access_token_secs")]
    pub access_token_duration_secs: u64,
    #[serde(default = "default_refresh_token_secs")]
    pub refresh_token_duration_secs: u64,
}

fn default_access_token_secs() -> u64 {
    15 * 60
}

fn default_refresh_token_secs() -> u64 {
    24 * 60 * 60
}

impl TokenConfig {
    pub fn access_token_duration(&self) -> Duration {
        Duration::from_secs(self.access_token_duration_secs)
    }

    pub fn refresh_token_duration(&self) -> Duration {
        Duration::from_secs(self.refresh_token_duration_secs)
    }
}

/// Account registration settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccountConfig {
    /// Balance credited to every new account, in minor units
    pub starting_balance: i64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(content).context("Failed to parse config yaml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.symmetric_key.len() < MIN_SYMMETRIC_KEY_LEN {
            bail!(
                "token.symmetric_key must be at least {} bytes, got {}",
                MIN_SYMMETRIC_KEY_LEN,
                self.token.symmetric_key.len()
            );
        }
        for (name, secs) in [
            ("access_token_duration_secs", self.token.access_token_duration_secs),
            ("refresh_token_duration_secs", self.token.refresh_token_duration_secs),
        ] {
            if !(1..=MAX_TOKEN_DURATION_SECS).contains(&secs) {
                bail!(
                    "token.{} must be between 1 and {} seconds, got {}",
                    name,
                    MAX_TOKEN_DURATION_SECS,
                    secs
                );
            }
        }
        Ok(())
    }
}
