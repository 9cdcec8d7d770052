//! Transfer Orchestrator
//!
//! Validates a transfer request against the Account Directory and hands the
//! balance mutation to the storage layer's atomic `transfer_tx`. The
//! orchestrator itself holds no locks: a transfer that passes validation may
//! still fail at commit if an account changed in between, and that failure is
//! returned unchanged.

use std::sync::Arc;

use tracing::{info, warn};

use super::models::{Pagination, Transfer, TransferTxResult};
use crate::account::{Account, is_owner};
use crate::auth::token::TokenPayload;
use crate::error::BankError;
use crate::store::{AccountStore, TransferStore};

pub struct TransferService {
    accounts: Arc<dyn AccountStore>,
    transfers: Arc<dyn TransferStore>,
}

impl TransferService {
    pub fn new(accounts: Arc<dyn AccountStore>, transfers: Arc<dyn TransferStore>) -> Self {
        Self {
            accounts,
            transfers,
        }
    }

    /// Check that `caller` may move funds from `from_account_id` to
    /// `to_account_id`, returning both accounts.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// same account, source exists, destination exists, caller owns source,
    /// currencies match, neither account is soft-deleted.
    pub async fn validate_transfer(
        &self,
        caller: &TokenPayload,
        from_account_id: i64,
        to_account_id: i64,
    ) -> Result<(Account, Account), BankError> {
        let reject = |err: BankError| {
            warn!(
                component = "transfer",
                action = "validate",
                from_account = from_account_id,
                to_account = to_account_id,
                username = caller.username(),
                error = %err,
                "transfer rejected"
            );
            err
        };

        if from_account_id == to_account_id {
            return Err(reject(BankError::SameAccountTransfer {
                from: from_account_id,
                to: to_account_id,
            }));
        }

        let from = self
            .accounts
            .get_account(from_account_id)
            .await?
            .ok_or_else(|| reject(BankError::AccountNotFound(from_account_id)))?;
        let to = self
            .accounts
            .get_account(to_account_id)
            .await?
            .ok_or_else(|| reject(BankError::AccountNotFound(to_account_id)))?;

        if !is_owner(caller, &from) {
            return Err(reject(BankError::NotAccountOwner));
        }

        if from.currency != to.currency {
            return Err(reject(BankError::CurrencyMismatch {
                from: from.currency,
                to: to.currency,
            }));
        }

        if let Some(deleted) = [&from, &to].into_iter().find(|a| a.is_deleted) {
            return Err(reject(BankError::AccountDeleted(deleted.id)));
        }

        Ok((from, to))
    }

    /// Move `amount` between two already-validated accounts
    ///
    /// Storage failures are returned exactly as the store reported them.
    pub async fn create_transfer(
        &self,
        from_account_id: i64,
        to_account_id: i64,
        amount: i64,
    ) -> Result<TransferTxResult, BankError> {
        if amount <= 0 {
            warn!(
                component = "transfer",
                action = "create",
                from_account = from_account_id,
                to_account = to_account_id,
                amount,
                "non-positive amount"
            );
            return Err(BankError::InvalidAmount(amount));
        }

        let result = self
            .transfers
            .transfer_tx(from_account_id, to_account_id, amount)
            .await
            .inspect_err(|e| {
                warn!(
                    component = "transfer",
                    action = "create",
                    from_account = from_account_id,
                    to_account = to_account_id,
                    amount,
                    error = %e,
                    "transfer_tx failed"
                )
            })?;

        info!(
            transfer_id = result.transfer.id,
            from_account = from_account_id,
            to_account = to_account_id,
            amount,
            "transfer completed"
        );
        Ok(result)
    }

    /// Validate then execute, the full path of a transfer request
    pub async fn transfer(
        &self,
        caller: &TokenPayload,
        from_account_id: i64,
        to_account_id: i64,
        amount: i64,
    ) -> Result<TransferTxResult, BankError> {
        let (from, to) = self
            .validate_transfer(caller, from_account_id, to_account_id)
            .await?;
        self.create_transfer(from.id, to.id, amount).await
    }

    /// Page through the transfers touching an account the caller owns,
    /// most recent first
    pub async fn get_list_transfer(
        &self,
        caller: &TokenPayload,
        account_id: i64,
        page: Pagination,
    ) -> Result<Vec<Transfer>, BankError> {
        let Some(account) = self.accounts.get_account(account_id).await? else {
            warn!(
                component = "transfer",
                action = "list",
                account_id,
                username = caller.username(),
                "account not found"
            );
            return Err(BankError::InvalidAccountId(account_id));
        };

        if !is_owner(caller, &account) {
            warn!(
                component = "transfer",
                action = "list",
                account_id,
                username = caller.username(),
                "caller does not own account"
            );
            return Err(BankError::NotAccountOwner);
        }

        Ok(self
            .transfers
            .list_transfers(account_id, page.limit(), page.offset())
            .await?)
    }

    /// Fetch one transfer; the caller must own either endpoint
    pub async fn get_transfer(
        &self,
        caller: &TokenPayload,
        transfer_id: i64,
    ) -> Result<Transfer, BankError> {
        let transfer = self
            .transfers
            .get_transfer(transfer_id)
            .await?
            .ok_or(BankError::TransferNotFound(transfer_id))?;

        for account_id in [transfer.from_account_id, transfer.to_account_id] {
            let owned = self
                .accounts
                .get_account(account_id)
                .await?
                .is_some_and(|account| is_owner(caller, &account));
            if owned {
                return Ok(transfer);
            }
        }

        warn!(
            component = "transfer",
            action = "get",
            transfer_id,
            username = caller.username(),
            "caller owns neither endpoint"
        );
        Err(BankError::NotAccountOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::CreateAccountParams;
    use crate::auth::token::test_support::caller;
    use crate::currency::Currency;
    use crate::error::StoreError;
    use crate::store::{MemoryStore, UserStore};
    use crate::user::models::CreateUserParams;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: TransferService,
    }

    impl Fixture {
        async fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            for name in ["alice1", "bobby1"] {
                store
                    .create_user(CreateUserParams {
                        username: name.to_string(),
                        hashed_password: "hash".to_string(),
                        full_name: name.to_string(),
                        email: format!("{}@example.com", name),
                    })
                    .await
                    .unwrap();
            }
            let service = TransferService::new(store.clone(), store.clone());
            Self { store, service }
        }

        async fn open(&self, owner: &str, currency: Currency, balance: i64) -> Account {
            self.store
                .create_account(CreateAccountParams {
                    owner: owner.to_string(),
                    currency,
                    balance,
                })
                .await
                .unwrap()
        }

        async fn balance(&self, id: i64) -> i64 {
            self.store.get_account(id).await.unwrap().unwrap().balance
        }
    }

    #[tokio::test]
    async fn test_same_account_is_rejected_first() {
        let fx = Fixture::new().await;
        // Id does not even exist; the same-account check comes before lookup
        let err = fx
            .service
            .validate_transfer(&caller("alice1"), 42, 42)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BankError::SameAccountTransfer { from: 42, to: 42 }
        ));
    }

    #[tokio::test]
    async fn test_missing_accounts_are_not_found() {
        let fx = Fixture::new().await;
        let a = fx.open("alice1", Currency::Usd, 1000).await;
        let alice = caller("alice1");

        assert!(matches!(
            fx.service.validate_transfer(&alice, 99, a.id).await,
            Err(BankError::AccountNotFound(99))
        ));
        assert!(matches!(
            fx.service.validate_transfer(&alice, a.id, 98).await,
            Err(BankError::AccountNotFound(98))
        ));
    }

    #[tokio::test]
    async fn test_transfer_moves_balances() {
        let fx = Fixture::new().await;
        let a = fx.open("alice1", Currency::Usd, 1000).await;
        let b = fx.open("bobby1", Currency::Usd, 500).await;

        let result = fx
            .service
            .transfer(&caller("alice1"), a.id, b.id, 200)
            .await
            .unwrap();

        assert_eq!(result.transfer.from_account_id, a.id);
        assert_eq!(result.transfer.to_account_id, b.id);
        assert_eq!(result.transfer.amount, 200);
        assert_eq!(result.from_entry.amount, -200);
        assert_eq!(result.to_entry.amount, 200);
        assert_eq!(fx.balance(a.id).await, 800);
        assert_eq!(fx.balance(b.id).await, 700);
        assert_eq!(fx.store.row_counts().unwrap(), (1, 2));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_initiate() {
        let fx = Fixture::new().await;
        let a = fx.open("alice1", Currency::Usd, 1000).await;
        let b = fx.open("bobby1", Currency::Usd, 500).await;

        let err = fx
            .service
            .transfer(&caller("alice1"), b.id, a.id, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, BankError::NotAccountOwner));
        assert_eq!(fx.balance(a.id).await, 1000);
        assert_eq!(fx.balance(b.id).await, 500);
        assert_eq!(fx.store.row_counts().unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_currency_mismatch_regardless_of_destination_owner() {
        let fx = Fixture::new().await;
        let usd = fx.open("alice1", Currency::Usd, 1000).await;
        let own_idr = fx.open("alice1", Currency::Idr, 1000).await;
        let bob_idr = fx.open("bobby1", Currency::Idr, 1000).await;
        let alice = caller("alice1");

        for to in [own_idr.id, bob_idr.id] {
            let err = fx
                .service
                .transfer(&alice, usd.id, to, 10)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                BankError::CurrencyMismatch {
                    from: Currency::Usd,
                    to: Currency::Idr
                }
            ));
        }
        assert_eq!(fx.balance(usd.id).await, 1000);
    }

    #[tokio::test]
    async fn test_deleted_endpoints_are_named() {
        let fx = Fixture::new().await;
        let a = fx.open("alice1", Currency::Usd, 1000).await;
        let b = fx.open("bobby1", Currency::Usd, 500).await;
        let alice = caller("alice1");

        fx.store.delete_account(b.id).await.unwrap();
        assert!(matches!(
            fx.service.validate_transfer(&alice, a.id, b.id).await,
            Err(BankError::AccountDeleted(id)) if id == b.id
        ));

        fx.store.delete_account(a.id).await.unwrap();
        assert!(matches!(
            fx.service.validate_transfer(&alice, a.id, b.id).await,
            Err(BankError::AccountDeleted(id)) if id == a.id
        ));
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected() {
        let fx = Fixture::new().await;
        let a = fx.open("alice1", Currency::Usd, 1000).await;
        let b = fx.open("bobby1", Currency::Usd, 500).await;

        for amount in [0, -5] {
            assert!(matches!(
                fx.service.create_transfer(a.id, b.id, amount).await,
                Err(BankError::InvalidAmount(n)) if n == amount
            ));
        }
        assert_eq!(fx.store.row_counts().unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_storage_failure_passes_through() {
        let fx = Fixture::new().await;
        let a = fx.open("alice1", Currency::Usd, 1000).await;
        let b = fx.open("bobby1", Currency::Usd, 500).await;
        let alice = caller("alice1");

        let (from, to) = fx.service.validate_transfer(&alice, a.id, b.id).await.unwrap();
        // Destination goes away between validation and commit
        fx.store.delete_account(to.id).await.unwrap();

        let err = fx
            .service
            .create_transfer(from.id, to.id, 100)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BankError::Storage(StoreError::AccountUnavailable(id)) if id == b.id
        ));
        assert_eq!(fx.balance(a.id).await, 1000);
    }

    #[tokio::test]
    async fn test_get_list_transfer() {
        let fx = Fixture::new().await;
        let a = fx.open("alice1", Currency::Usd, 1000).await;
        let b = fx.open("bobby1", Currency::Usd, 500).await;
        let alice = caller("alice1");
        for amount in [10, 20, 30] {
            fx.service.transfer(&alice, a.id, b.id, amount).await.unwrap();
        }

        let page = fx
            .service
            .get_list_transfer(&alice, a.id, Pagination::new(1, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(page.iter().map(|t| t.amount).collect::<Vec<_>>(), vec![30, 20]);

        let page = fx
            .service
            .get_list_transfer(&alice, a.id, Pagination::new(2, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(page.iter().map(|t| t.amount).collect::<Vec<_>>(), vec![10]);

        // Bob sees incoming transfers on his own account
        let bob_page = fx
            .service
            .get_list_transfer(&caller("bobby1"), b.id, Pagination::new(1, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(bob_page.len(), 3);
    }

    #[tokio::test]
    async fn test_get_list_transfer_errors() {
        let fx = Fixture::new().await;
        let b = fx.open("bobby1", Currency::Usd, 500).await;
        let alice = caller("alice1");
        let page = Pagination::new(1, 5).unwrap();

        assert!(matches!(
            fx.service.get_list_transfer(&alice, 777, page).await,
            Err(BankError::InvalidAccountId(777))
        ));
        assert!(matches!(
            fx.service.get_list_transfer(&alice, b.id, page).await,
            Err(BankError::NotAccountOwner)
        ));
    }

    #[tokio::test]
    async fn test_get_transfer_is_stable() {
        let fx = Fixture::new().await;
        let a = fx.open("alice1", Currency::Usd, 1000).await;
        let b = fx.open("bobby1", Currency::Usd, 500).await;
        let result = fx
            .service
            .transfer(&caller("alice1"), a.id, b.id, 200)
            .await
            .unwrap();
        let id = result.transfer.id;

        let first = fx.service.get_transfer(&caller("alice1"), id).await.unwrap();
        let second = fx.service.get_transfer(&caller("bobby1"), id).await.unwrap();
        assert_eq!(first, result.transfer);
        assert_eq!(first, second);

        let entry = fx.store.get_entry(result.to_entry.id).await.unwrap();
        assert_eq!(entry, Some(result.to_entry));

        assert!(matches!(
            fx.service.get_transfer(&caller("mallory"), id).await,
            Err(BankError::NotAccountOwner)
        ));
        assert!(matches!(
            fx.service.get_transfer(&caller("alice1"), 555).await,
            Err(BankError::TransferNotFound(555))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_transfers_preserve_total() {
        let fx = Fixture::new().await;
        let a = fx.open("alice1", Currency::Usd, 1000).await;
        let b = fx.open("bobby1", Currency::Usd, 1000).await;
        let service = Arc::new(fx.service);

        let mut handles = Vec::new();
        for i in 0..20 {
            let service = service.clone();
            let (user, from, to) = if i % 2 == 0 {
                ("alice1", a.id, b.id)
            } else {
                ("bobby1", b.id, a.id)
            };
            handles.push(tokio::spawn(async move {
                service.transfer(&caller(user), from, to, 5).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let total = fx.store.get_account(a.id).await.unwrap().unwrap().balance
            + fx.store.get_account(b.id).await.unwrap().unwrap().balance;
        assert_eq!(total, 2000);
        assert_eq!(fx.store.row_counts().unwrap(), (20, 40));
    }
}
