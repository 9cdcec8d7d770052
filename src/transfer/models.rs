//! Transfer and ledger entry records

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::account::Account;
use crate::error::BankError;

/// A completed movement of funds between two accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Transfer {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    /// Always positive, in minor units
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// One signed leg of a transfer; the two legs of a transfer sum to zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Entry {
    pub id: i64,
    pub account_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Everything the atomic transfer primitive wrote, as committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TransferTxResult {
    pub transfer: Transfer,
    pub from_account: Account,
    pub to_account: Account,
    pub from_entry: Entry,
    pub to_entry: Entry,
}

/// Maximum rows per page of a transfer listing
pub const MAX_PAGE_SIZE: i64 = 100;

/// One page of a transfer listing. `page_id` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_id: i64,
    page_size: i64,
}

impl Pagination {
    pub fn new(page_id: i64, page_size: i64) -> Result<Self, BankError> {
        if page_id < 1 {
            return Err(BankError::InvalidPagination(format!(
                "page_id must be at least 1, got {}",
                page_id
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(BankError::InvalidPagination(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        Ok(Self { page_id, page_size })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Number of rows skipped before this page
    pub fn offset(&self) -> i64 {
        (self.page_id - 1).saturating_mul(self.page_size)
    }
}
