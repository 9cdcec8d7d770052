//! Storage collaborator
//!
//! One trait per table group. `PgStore` is the transactional PostgreSQL
//! backend; `MemoryStore` is an in-memory fake with the same atomicity
//! guarantees, used by tests.
//!
//! Lookups return `Ok(None)` for a missing row. Services decide which
//! domain error a missing row becomes.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::account::{Account, CreateAccountParams};
use crate::auth::models::{CreateSessionParams, Session};
use crate::error::StoreError;
use crate::transfer::models::{Entry, Transfer, TransferTxResult};
use crate::user::models::{CreateUserParams, UpdateUserParams, User};

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_account(&self, params: CreateAccountParams) -> Result<Account, StoreError>;

    async fn get_account(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// Active (not soft-deleted) accounts of `owner`, oldest first
    async fn list_accounts(&self, owner: &str) -> Result<Vec<Account>, StoreError>;

    /// Soft-deleted accounts of `owner`, oldest first
    async fn list_deleted_accounts(&self, owner: &str) -> Result<Vec<Account>, StoreError>;

    async fn delete_account(&self, id: i64) -> Result<(), StoreError>;

    async fn restore_account(&self, id: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Debit `from`, credit `to`, insert the Transfer and both Entries as
    /// one atomic, isolated unit. Nothing is written on error.
    ///
    /// Fails with `StoreError::AccountUnavailable` if either account is
    /// missing or soft-deleted at commit time.
    async fn transfer_tx(
        &self,
        from_account_id: i64,
        to_account_id: i64,
        amount: i64,
    ) -> Result<TransferTxResult, StoreError>;

    async fn get_transfer(&self, id: i64) -> Result<Option<Transfer>, StoreError>;

    async fn get_entry(&self, id: i64) -> Result<Option<Entry>, StoreError>;

    /// Transfers touching `account_id` on either side, most recent first
    async fn list_transfers(
        &self,
        account_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transfer>, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, params: CreateSessionParams) -> Result<Session, StoreError>;

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError>;

    /// Administrative block. Returns false if no such session exists.
    async fn block_session(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, params: CreateUserParams) -> Result<User, StoreError>;

    async fn get_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Returns `Ok(None)` if the user does not exist
    async fn update_user(&self, params: UpdateUserParams) -> Result<Option<User>, StoreError>;
}
