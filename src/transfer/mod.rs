//! Funds transfer between accounts
//!
//! `TransferService` validates ownership, currency and soft-delete state,
//! then delegates the balance mutation to `TransferStore::transfer_tx`.

pub mod models;
pub mod service;

pub use models::{Entry, Pagination, Transfer, TransferTxResult};
pub use service::TransferService;
