//! Bank API - accounts, funds transfers and refresh-token sessions
//!
//! # Modules
//!
//! - [`config`] - YAML configuration, loaded once at startup
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`currency`] - Supported currencies
//! - [`error`] - `BankError` and `StoreError`
//! - [`store`] - Storage traits with PostgreSQL and in-memory backends
//! - [`account`] - Account Directory and the `is_owner` predicate
//! - [`transfer`] - Transfer Orchestrator
//! - [`auth`] - Token Authority, passwords, login and session renewal
//! - [`user`] - User registration and profile
//! - [`gateway`] - axum HTTP gateway

pub mod config;
pub mod currency;
pub mod db;
pub mod error;
pub mod logging;
pub mod store;

pub mod account;
pub mod auth;
pub mod transfer;
pub mod user;

pub mod gateway;

// Convenient re-exports at crate root
pub use account::{Account, AccountService, is_owner};
pub use auth::{AuthService, JwtMaker, TokenKind, TokenPayload};
pub use currency::Currency;
pub use error::{BankError, StoreError};
pub use transfer::{Pagination, Transfer, TransferService, TransferTxResult};
pub use user::UserService;
