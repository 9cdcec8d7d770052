//! End-to-end scenarios over the in-memory store: transfers between two
//! users and refresh-token renewal against a blocked session.

use std::sync::Arc;

use bank_api::account::CreateAccountParams;
use bank_api::auth::ClientMeta;
use bank_api::config::TokenConfig;
use bank_api::store::{AccountStore, MemoryStore, SessionStore, TransferStore};
use bank_api::{
    AccountService, AuthService, BankError, Currency, JwtMaker, Pagination, TransferService,
    UserService,
};

struct Bank {
    store: Arc<MemoryStore>,
    jwt: Arc<JwtMaker>,
    users: UserService,
    accounts: AccountService,
    transfers: TransferService,
    auth: AuthService,
}

impl Bank {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let jwt = Arc::new(JwtMaker::new(&TokenConfig {
            symmetric_key: "scenario-symmetric-key-0123456789abcdef".to_string(),
            access_token_duration_secs: 900,
            refresh_token_duration_secs: 86_400,
        })
        .unwrap());
        Self {
            users: UserService::new(store.clone()),
            accounts: AccountService::new(store.clone(), 1000),
            transfers: TransferService::new(store.clone(), store.clone()),
            auth: AuthService::new(store.clone(), store.clone(), jwt.clone()),
            store,
            jwt,
        }
    }

    async fn register(&self, username: &str) {
        self.users
            .register(
                username,
                username,
                &format!("{}@example.com", username),
                "secret123",
            )
            .await
            .unwrap();
    }

    async fn open(&self, owner: &str, currency: Currency, balance: i64) -> i64 {
        self.store
            .create_account(CreateAccountParams {
                owner: owner.to_string(),
                currency,
                balance,
            })
            .await
            .unwrap()
            .id
    }

    async fn balance(&self, id: i64) -> i64 {
        self.store.get_account(id).await.unwrap().unwrap().balance
    }
}

/// Alice (account 1, USD 1000) and Bob (account 2, USD 500)
async fn alice_and_bob() -> Bank {
    let bank = Bank::new();
    bank.register("alice1").await;
    bank.register("bobby1").await;
    assert_eq!(bank.open("alice1", Currency::Usd, 1000).await, 1);
    assert_eq!(bank.open("bobby1", Currency::Usd, 500).await, 2);
    bank
}

#[tokio::test]
async fn alice_transfers_200_to_bob() {
    let bank = alice_and_bob().await;
    let (_, alice) = bank.jwt.create_access_token("alice1").unwrap();

    let result = bank.transfers.transfer(&alice, 1, 2, 200).await.unwrap();

    assert_eq!(result.transfer.from_account_id, 1);
    assert_eq!(result.transfer.to_account_id, 2);
    assert_eq!(result.transfer.amount, 200);
    assert_eq!(bank.balance(1).await, 800);
    assert_eq!(bank.balance(2).await, 700);
    assert_eq!(bank.store.row_counts().unwrap(), (1, 2));

    // Re-querying the completed transfer yields the same rows
    let again = bank
        .store
        .get_transfer(result.transfer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again, result.transfer);
    let from_entry = bank
        .store
        .get_entry(result.from_entry.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(from_entry, result.from_entry);

    let history = bank
        .transfers
        .get_list_transfer(&alice, 1, Pagination::new(1, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(history, vec![result.transfer]);
}

#[tokio::test]
async fn alice_cannot_spend_from_bobs_account() {
    let bank = alice_and_bob().await;
    let (_, alice) = bank.jwt.create_access_token("alice1").unwrap();

    let err = bank.transfers.transfer(&alice, 2, 1, 100).await.unwrap_err();

    assert!(matches!(err, BankError::NotAccountOwner));
    assert_eq!(bank.balance(1).await, 1000);
    assert_eq!(bank.balance(2).await, 500);
}

#[tokio::test]
async fn usd_to_idr_is_a_currency_mismatch() {
    let bank = alice_and_bob().await;
    let idr = bank.open("bobby1", Currency::Idr, 1000).await;
    let (_, alice) = bank.jwt.create_access_token("alice1").unwrap();

    let err = bank.transfers.transfer(&alice, 1, idr, 100).await.unwrap_err();

    assert!(matches!(
        err,
        BankError::CurrencyMismatch {
            from: Currency::Usd,
            to: Currency::Idr
        }
    ));
    assert_eq!(bank.balance(1).await, 1000);
    assert_eq!(bank.balance(idr).await, 1000);
}

#[tokio::test]
async fn accounts_opened_through_the_service_start_at_configured_balance() {
    let bank = Bank::new();
    bank.register("carol1").await;
    let (_, carol) = bank.jwt.create_access_token("carol1").unwrap();

    let account = bank
        .accounts
        .create_account(&carol, Currency::Idr)
        .await
        .unwrap();
    assert_eq!(account.balance, 1000);
    assert_eq!(bank.accounts.list_accounts(&carol).await.unwrap(), vec![account]);
}

#[tokio::test]
async fn blocked_session_cannot_renew() {
    let bank = alice_and_bob().await;
    let login = bank
        .auth
        .login("alice1", "secret123", ClientMeta::default())
        .await
        .unwrap();

    assert!(bank.auth.renew_access_token(&login.refresh_token).await.is_ok());

    assert!(bank.store.block_session(login.session_id).await.unwrap());
    let err = bank
        .auth
        .renew_access_token(&login.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, BankError::BlockedRefreshToken));
}
