use std::sync::Arc;

use crate::account::AccountService;
use crate::auth::{AuthService, JwtMaker};
use crate::db::Database;
use crate::store::{AccountStore, SessionStore, TransferStore, UserStore};
use crate::transfer::TransferService;
use crate::user::UserService;

/// Gateway application state (shared across requests)
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub transfers: Arc<TransferService>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    /// Verifies bearer tokens in the auth middleware
    pub jwt: Arc<JwtMaker>,
    /// PostgreSQL pool, pinged by the health check when present
    pub pg_db: Option<Arc<Database>>,
}

impl AppState {
    /// Wire every service to one storage backend
    pub fn new<S>(store: Arc<S>, jwt: Arc<JwtMaker>, starting_balance: i64) -> Self
    where
        S: AccountStore + TransferStore + SessionStore + UserStore + 'static,
    {
        Self {
            accounts: Arc::new(AccountService::new(store.clone(), starting_balance)),
            transfers: Arc::new(TransferService::new(store.clone(), store.clone())),
            auth: Arc::new(AuthService::new(store.clone(), store.clone(), jwt.clone())),
            users: Arc::new(UserService::new(store)),
            jwt,
            pg_db: None,
        }
    }

    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.pg_db = Some(db);
        self
    }
}
