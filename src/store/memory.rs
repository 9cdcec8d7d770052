//! In-memory storage backend
//!
//! All tables sit behind one mutex, so every operation (including
//! `transfer_tx`) is atomic and serialized. Constraint checks mirror the
//! PostgreSQL schema: unique usernames/emails, one account per
//! (owner, currency), and foreign keys from accounts/sessions to users.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{AccountStore, SessionStore, TransferStore, UserStore};
use crate::account::{Account, CreateAccountParams};
use crate::auth::models::{CreateSessionParams, Session};
use crate::error::StoreError;
use crate::transfer::models::{Entry, Transfer, TransferTxResult};
use crate::user::models::{CreateUserParams, UpdateUserParams, User};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    accounts: BTreeMap<i64, Account>,
    transfers: BTreeMap<i64, Transfer>,
    entries: BTreeMap<i64, Entry>,
    sessions: HashMap<Uuid, Session>,
    last_account_id: i64,
    last_transfer_id: i64,
    last_entry_id: i64,
}

impl Tables {
    fn insert_entry(&mut self, account_id: i64, amount: i64) -> Entry {
        self.last_entry_id += 1;
        let entry = Entry {
            id: self.last_entry_id,
            account_id,
            amount,
            created_at: Utc::now(),
        };
        self.entries.insert(entry.id, entry.clone());
        entry
    }

    fn active_account(&self, id: i64) -> Result<&Account, StoreError> {
        self.accounts
            .get(&id)
            .filter(|a| !a.is_deleted)
            .ok_or(StoreError::AccountUnavailable(id))
    }

    fn set_deleted(&mut self, id: i64, deleted: bool) {
        if let Some(account) = self.accounts.get_mut(&id) {
            account.is_deleted = deleted;
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Internal("Mutex lock failed".to_string()))
    }

    /// Number of transfers and entries stored
    pub fn row_counts(&self) -> Result<(usize, usize), StoreError> {
        let tables = self.tables()?;
        Ok((tables.transfers.len(), tables.entries.len()))
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, params: CreateAccountParams) -> Result<Account, StoreError> {
        let mut tables = self.tables()?;

        if !tables.users.contains_key(&params.owner) {
            return Err(StoreError::ForeignKeyViolation(
                "accounts_owner_fkey".to_string(),
            ));
        }
        if tables
            .accounts
            .values()
            .any(|a| a.owner == params.owner && a.currency == params.currency)
        {
            return Err(StoreError::UniqueViolation(
                "accounts_owner_currency_key".to_string(),
            ));
        }

        tables.last_account_id += 1;
        let account = Account {
            id: tables.last_account_id,
            owner: params.owner,
            balance: params.balance,
            currency: params.currency,
            is_deleted: false,
            created_at: Utc::now(),
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.tables()?.accounts.get(&id).cloned())
    }

    async fn list_accounts(&self, owner: &str) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .tables()?
            .accounts
            .values()
            .filter(|a| a.owner == owner && !a.is_deleted)
            .cloned()
            .collect())
    }

    async fn list_deleted_accounts(&self, owner: &str) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .tables()?
            .accounts
            .values()
            .filter(|a| a.owner == owner && a.is_deleted)
            .cloned()
            .collect())
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        self.tables()?.set_deleted(id, true);
        Ok(())
    }

    async fn restore_account(&self, id: i64) -> Result<(), StoreError> {
        self.tables()?.set_deleted(id, false);
        Ok(())
    }
}

#[async_trait]
impl TransferStore for MemoryStore {
    async fn transfer_tx(
        &self,
        from_account_id: i64,
        to_account_id: i64,
        amount: i64,
    ) -> Result<TransferTxResult, StoreError> {
        // Same constraints as the transfers table
        if from_account_id == to_account_id || amount <= 0 {
            return Err(StoreError::Internal(
                "transfers check constraint violated".to_string(),
            ));
        }

        let mut tables = self.tables()?;

        // Check everything before the first write so a failure leaves no trace
        let from_balance = tables
            .active_account(from_account_id)?
            .balance
            .checked_sub(amount)
            .ok_or_else(|| StoreError::Internal("balance overflow".to_string()))?;
        let to_balance = tables
            .active_account(to_account_id)?
            .balance
            .checked_add(amount)
            .ok_or_else(|| StoreError::Internal("balance overflow".to_string()))?;

        tables.last_transfer_id += 1;
        let transfer = Transfer {
            id: tables.last_transfer_id,
            from_account_id,
            to_account_id,
            amount,
            created_at: Utc::now(),
        };
        tables.transfers.insert(transfer.id, transfer.clone());

        let from_entry = tables.insert_entry(from_account_id, -amount);
        let to_entry = tables.insert_entry(to_account_id, amount);

        let mut update_balance = |id: i64, balance: i64| -> Result<Account, StoreError> {
            let account = tables
                .accounts
                .get_mut(&id)
                .ok_or(StoreError::AccountUnavailable(id))?;
            account.balance = balance;
            Ok(account.clone())
        };
        let from_account = update_balance(from_account_id, from_balance)?;
        let to_account = update_balance(to_account_id, to_balance)?;

        Ok(TransferTxResult {
            transfer,
            from_account,
            to_account,
            from_entry,
            to_entry,
        })
    }

    async fn get_transfer(&self, id: i64) -> Result<Option<Transfer>, StoreError> {
        Ok(self.tables()?.transfers.get(&id).cloned())
    }

    async fn get_entry(&self, id: i64) -> Result<Option<Entry>, StoreError> {
        Ok(self.tables()?.entries.get(&id).cloned())
    }

    async fn list_transfers(
        &self,
        account_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transfer>, StoreError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let offset = usize::try_from(offset).unwrap_or(0);

        Ok(self
            .tables()?
            .transfers
            .values()
            .rev()
            .filter(|t| t.from_account_id == account_id || t.to_account_id == account_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, params: CreateSessionParams) -> Result<Session, StoreError> {
        let mut tables = self.tables()?;

        if !tables.users.contains_key(&params.username) {
            return Err(StoreError::ForeignKeyViolation(
                "sessions_username_fkey".to_string(),
            ));
        }
        if tables.sessions.contains_key(&params.id) {
            return Err(StoreError::UniqueViolation("sessions_pkey".to_string()));
        }

        let session = Session {
            id: params.id,
            username: params.username,
            refresh_token: params.refresh_token,
            user_agent: params.client.user_agent,
            client_ip: params.client.client_ip,
            is_blocked: false,
            expires_at: params.expires_at,
            created_at: Utc::now(),
        };
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        Ok(self.tables()?.sessions.get(&id).cloned())
    }

    async fn block_session(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        match tables.sessions.get_mut(&id) {
            Some(session) => {
                session.is_blocked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, params: CreateUserParams) -> Result<User, StoreError> {
        let mut tables = self.tables()?;

        if tables.users.contains_key(&params.username) {
            return Err(StoreError::UniqueViolation("users_pkey".to_string()));
        }
        if tables.users.values().any(|u| u.email == params.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            username: params.username,
            hashed_password: params.hashed_password,
            full_name: params.full_name,
            email: params.email,
            password_changed_at: now,
            created_at: now,
        };
        tables.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.get(username).cloned())
    }

    async fn update_user(&self, params: UpdateUserParams) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables()?;

        if let Some(email) = &params.email {
            if tables
                .users
                .values()
                .any(|u| &u.email == email && u.username != params.username)
            {
                return Err(StoreError::UniqueViolation("users_email_key".to_string()));
            }
        }

        let Some(user) = tables.users.get_mut(&params.username) else {
            return Ok(None);
        };
        if let Some(full_name) = params.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = params.email {
            user.email = email;
        }
        if let Some(hashed_password) = params.hashed_password {
            user.hashed_password = hashed_password;
            user.password_changed_at = Utc::now();
        }
        Ok(Some(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::ClientMeta;
    use crate::currency::Currency;

    async fn store_with_user(username: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_user(CreateUserParams {
                username: username.to_string(),
                hashed_password: "hash".to_string(),
                full_name: "Test User".to_string(),
                email: format!("{}@example.com", username),
            })
            .await
            .unwrap();
        store
    }

    async fn open(store: &MemoryStore, owner: &str, currency: Currency, balance: i64) -> Account {
        store
            .create_account(CreateAccountParams {
                owner: owner.to_string(),
                currency,
                balance,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_account_constraints() {
        let store = store_with_user("alice1").await;
        open(&store, "alice1", Currency::Usd, 1000).await;

        let dup = store
            .create_account(CreateAccountParams {
                owner: "alice1".to_string(),
                currency: Currency::Usd,
                balance: 1000,
            })
            .await;
        assert!(matches!(dup, Err(StoreError::UniqueViolation(_))));

        let orphan = store
            .create_account(CreateAccountParams {
                owner: "nobody".to_string(),
                currency: Currency::Usd,
                balance: 1000,
            })
            .await;
        assert!(matches!(orphan, Err(StoreError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_delete_and_restore_move_between_lists() {
        let store = store_with_user("alice1").await;
        let usd = open(&store, "alice1", Currency::Usd, 1000).await;
        let idr = open(&store, "alice1", Currency::Idr, 1000).await;

        store.delete_account(usd.id).await.unwrap();
        let active = store.list_accounts("alice1").await.unwrap();
        let deleted = store.list_deleted_accounts("alice1").await.unwrap();
        assert_eq!(active.iter().map(|a| a.id).collect::<Vec<_>>(), vec![idr.id]);
        assert_eq!(deleted.iter().map(|a| a.id).collect::<Vec<_>>(), vec![usd.id]);

        store.restore_account(usd.id).await.unwrap();
        assert_eq!(store.list_accounts("alice1").await.unwrap().len(), 2);
        assert!(store.list_deleted_accounts("alice1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_tx_writes_all_rows() {
        let store = store_with_user("alice1").await;
        store
            .create_user(CreateUserParams {
                username: "bobby1".to_string(),
                hashed_password: "hash".to_string(),
                full_name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            })
            .await
            .unwrap();
        let a = open(&store, "alice1", Currency::Usd, 1000).await;
        let b = open(&store, "bobby1", Currency::Usd, 500).await;

        let result = store.transfer_tx(a.id, b.id, 200).await.unwrap();

        assert_eq!(result.from_account.balance, 800);
        assert_eq!(result.to_account.balance, 700);
        assert_eq!(result.from_entry.amount + result.to_entry.amount, 0);
        assert_eq!(result.from_entry.account_id, a.id);
        assert_eq!(result.to_entry.account_id, b.id);
        assert_eq!(store.row_counts().unwrap(), (1, 2));
    }

    #[tokio::test]
    async fn test_transfer_tx_to_deleted_account_writes_nothing() {
        let store = store_with_user("alice1").await;
        let a = open(&store, "alice1", Currency::Usd, 1000).await;
        let b = open(&store, "alice1", Currency::Idr, 1000).await;
        store.delete_account(b.id).await.unwrap();

        let result = store.transfer_tx(a.id, b.id, 10).await;
        assert!(matches!(result, Err(StoreError::AccountUnavailable(id)) if id == b.id));
        assert_eq!(store.row_counts().unwrap(), (0, 0));
        assert_eq!(store.get_account(a.id).await.unwrap().unwrap().balance, 1000);
    }

    #[tokio::test]
    async fn test_list_transfers_most_recent_first_with_paging() {
        let store = store_with_user("alice1").await;
        let a = open(&store, "alice1", Currency::Usd, 1000).await;
        let b = open(&store, "alice1", Currency::Idr, 1000).await;
        for amount in 1..=5 {
            store.transfer_tx(a.id, b.id, amount).await.unwrap();
        }

        let page = store.list_transfers(a.id, 2, 0).await.unwrap();
        assert_eq!(page.iter().map(|t| t.amount).collect::<Vec<_>>(), vec![5, 4]);

        let page = store.list_transfers(b.id, 2, 4).await.unwrap();
        assert_eq!(page.iter().map(|t| t.amount).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_block_session() {
        let store = store_with_user("alice1").await;
        let id = Uuid::new_v4();
        store
            .create_session(CreateSessionParams {
                id,
                username: "alice1".to_string(),
                refresh_token: "token".to_string(),
                client: ClientMeta {
                    user_agent: "test-agent".to_string(),
                    client_ip: "127.0.0.1".to_string(),
                },
                expires_at: Utc::now(),
            })
            .await
            .unwrap();

        assert!(store.block_session(id).await.unwrap());
        assert!(store.get_session(id).await.unwrap().unwrap().is_blocked);
        assert!(!store.block_session(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_user_email_must_stay_unique() {
        let store = store_with_user("alice1").await;
        store
            .create_user(CreateUserParams {
                username: "bobby1".to_string(),
                hashed_password: "hash".to_string(),
                full_name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            })
            .await
            .unwrap();

        let result = store
            .update_user(UpdateUserParams {
                username: "alice1".to_string(),
                email: Some("bob@example.com".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(StoreError::UniqueViolation(_))));

        let missing = store
            .update_user(UpdateUserParams {
                username: "ghost".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
