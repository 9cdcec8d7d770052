//! Account Directory service
//!
//! Every account-scoped read and write goes through `is_owner`.

use std::sync::Arc;

use tracing::warn;

use super::models::{Account, CreateAccountParams};
use crate::auth::token::TokenPayload;
use crate::currency::Currency;
use crate::error::BankError;
use crate::store::AccountStore;

/// The single authorization predicate for account-scoped operations
pub fn is_owner(caller: &TokenPayload, account: &Account) -> bool {
    caller.username() == account.owner
}

pub struct AccountService {
    store: Arc<dyn AccountStore>,
    starting_balance: i64,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, starting_balance: i64) -> Self {
        Self {
            store,
            starting_balance,
        }
    }

    /// Open an account for the caller in `currency`
    pub async fn create_account(
        &self,
        caller: &TokenPayload,
        currency: Currency,
    ) -> Result<Account, BankError> {
        let account = self
            .store
            .create_account(CreateAccountParams {
                owner: caller.username().to_string(),
                currency,
                balance: self.starting_balance,
            })
            .await
            .inspect_err(|e| {
                warn!(
                    component = "account",
                    action = "create",
                    username = caller.username(),
                    currency = %currency,
                    error = %e,
                    "create account failed"
                )
            })?;

        tracing::info!(
            account_id = account.id,
            username = caller.username(),
            currency = %currency,
            "account created"
        );
        Ok(account)
    }

    /// Resolve an account by id, `AccountNotFound` if it does not exist
    pub async fn is_valid_account(&self, id: i64) -> Result<Account, BankError> {
        self.store
            .get_account(id)
            .await?
            .ok_or(BankError::AccountNotFound(id))
    }

    /// Fetch an account the caller owns
    pub async fn get_account(&self, caller: &TokenPayload, id: i64) -> Result<Account, BankError> {
        let account = self.is_valid_account(id).await?;
        self.ensure_owner(caller, &account, "get")?;
        Ok(account)
    }

    pub async fn list_accounts(&self, caller: &TokenPayload) -> Result<Vec<Account>, BankError> {
        Ok(self.store.list_accounts(caller.username()).await?)
    }

    pub async fn list_deleted_accounts(
        &self,
        caller: &TokenPayload,
    ) -> Result<Vec<Account>, BankError> {
        Ok(self.store.list_deleted_accounts(caller.username()).await?)
    }

    /// Soft-delete an account the caller owns
    pub async fn delete_account(&self, caller: &TokenPayload, id: i64) -> Result<(), BankError> {
        let account = self.is_valid_account(id).await?;
        self.ensure_owner(caller, &account, "delete")?;
        self.store.delete_account(id).await?;

        tracing::info!(account_id = id, username = caller.username(), "account deleted");
        Ok(())
    }

    /// Undo a soft-delete on an account the caller owns
    pub async fn restore_account(&self, caller: &TokenPayload, id: i64) -> Result<(), BankError> {
        let account = self.is_valid_account(id).await?;
        self.ensure_owner(caller, &account, "restore")?;
        self.store.restore_account(id).await?;

        tracing::info!(account_id = id, username = caller.username(), "account restored");
        Ok(())
    }

    fn ensure_owner(
        &self,
        caller: &TokenPayload,
        account: &Account,
        action: &'static str,
    ) -> Result<(), BankError> {
        if is_owner(caller, account) {
            return Ok(());
        }
        warn!(
            component = "account",
            action,
            account_id = account.id,
            username = caller.username(),
            "caller does not own account"
        );
        Err(BankError::NotAccountOwner)
    }
}
