//! Account Directory
//!
//! Account records (balance, currency, owner, soft-delete flag) and the
//! owner-checked operations on them.

pub mod models;
pub mod service;

pub use models::{Account, CreateAccountParams};
pub use service::{AccountService, is_owner};
