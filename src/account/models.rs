//! Data models for bank accounts

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::currency::Currency;

/// Bank account
///
/// `balance` is in minor currency units and only changes through the
/// atomic transfer primitive of the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub balance: i64,
    #[sqlx(try_from = "String")]
    pub currency: Currency,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Parameters for opening a new account
#[derive(Debug, Clone)]
pub struct CreateAccountParams {
    pub owner: String,
    pub currency: Currency,
    pub balance: i64,
}
