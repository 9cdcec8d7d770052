//! Error types
//!
//! `BankError` is the failure taxonomy every service returns. Storage failures
//! are carried unchanged inside `BankError::Storage`; the transport layer is
//! the only place that turns a kind into a user-visible status.

use thiserror::Error;

use crate::currency::Currency;

/// Failures raised by a storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// An account was removed or soft-deleted between validation and commit
    #[error("Account {0} is no longer available for transfer")]
    AccountUnavailable(i64),

    #[error("Storage internal error: {0}")]
    Internal(String),
}

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => return StoreError::UniqueViolation(constraint),
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return StoreError::ForeignKeyViolation(constraint);
                }
                _ => {}
            }
        }
        StoreError::Database(e)
    }
}

/// Banking core error kinds
#[derive(Error, Debug)]
pub enum BankError {
    // === Transfer validation ===
    #[error("can't transfer to the same account, from_account_id={from}, to_account_id={to}")]
    SameAccountTransfer { from: i64, to: i64 },

    #[error("account {0} not found")]
    AccountNotFound(i64),

    #[error("invalid account id")]
    InvalidAccountId(i64),

    #[error("account doesn't belong to authenticated user")]
    NotAccountOwner,

    #[error("currency mismatch from_account.currency={from}, to_account.currency={to}")]
    CurrencyMismatch { from: Currency, to: Currency },

    #[error("account {0} is deleted")]
    AccountDeleted(i64),

    #[error("amount must be greater than zero, got {0}")]
    InvalidAmount(i64),

    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("transfer {0} not found")]
    TransferNotFound(i64),

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    // === Session / token ===
    #[error("invalid token")]
    InvalidToken,

    #[error("refresh token is blocked")]
    BlockedRefreshToken,

    #[error("refresh token has expired")]
    ExpiredRefreshToken,

    #[error("refresh token doesn't match with stored refresh token")]
    MismatchedRefreshTokens,

    // === User ===
    #[error("new email is the same as old email")]
    EmailSameAsOld,

    #[error("old password is different from the one stored in the database")]
    PasswordWrong,

    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("username or email already exists")]
    UserAlreadyExists,

    #[error("invalid username or password")]
    InvalidCredentials,

    // === Infrastructure ===
    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl BankError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            BankError::SameAccountTransfer { .. } => "SAME_ACCOUNT_TRANSFER",
            BankError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            BankError::InvalidAccountId(_) => "INVALID_ACCOUNT_ID",
            BankError::NotAccountOwner => "NOT_ACCOUNT_OWNER",
            BankError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            BankError::AccountDeleted(_) => "ACCOUNT_DELETED",
            BankError::InvalidAmount(_) => "INVALID_AMOUNT",
            BankError::UnsupportedCurrency(_) => "UNSUPPORTED_CURRENCY",
            BankError::TransferNotFound(_) => "TRANSFER_NOT_FOUND",
            BankError::InvalidPagination(_) => "INVALID_PAGINATION",
            BankError::InvalidToken => "INVALID_TOKEN",
            BankError::BlockedRefreshToken => "BLOCKED_REFRESH_TOKEN",
            BankError::ExpiredRefreshToken => "EXPIRED_REFRESH_TOKEN",
            BankError::MismatchedRefreshTokens => "MISMATCHED_REFRESH_TOKENS",
            BankError::EmailSameAsOld => "EMAIL_SAME_AS_OLD",
            BankError::PasswordWrong => "PASSWORD_WRONG",
            BankError::UserNotFound(_) => "USER_NOT_FOUND",
            BankError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            BankError::InvalidCredentials => "INVALID_CREDENTIALS",
            BankError::Internal(_) => "INTERNAL_ERROR",
            BankError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            BankError::SameAccountTransfer { .. }
            | BankError::InvalidAccountId(_)
            | BankError::CurrencyMismatch { .. }
            | BankError::InvalidAmount(_)
            | BankError::UnsupportedCurrency(_)
            | BankError::InvalidPagination(_)
            | BankError::EmailSameAsOld => 400,
            BankError::InvalidToken
            | BankError::BlockedRefreshToken
            | BankError::ExpiredRefreshToken
            | BankError::MismatchedRefreshTokens
            | BankError::PasswordWrong
            | BankError::InvalidCredentials => 401,
            BankError::NotAccountOwner => 403,
            BankError::AccountNotFound(_)
            | BankError::TransferNotFound(_)
            | BankError::UserNotFound(_) => 404,
            BankError::UserAlreadyExists => 409,
            BankError::AccountDeleted(_)
            | BankError::Storage(StoreError::AccountUnavailable(_)) => 422,
            BankError::Storage(StoreError::UniqueViolation(_))
            | BankError::Storage(StoreError::ForeignKeyViolation(_)) => 409,
            BankError::Internal(_) | BankError::Storage(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BankError::SameAccountTransfer { from: 1, to: 1 }.code(),
            "SAME_ACCOUNT_TRANSFER"
        );
        assert_eq!(BankError::BlockedRefreshToken.code(), "BLOCKED_REFRESH_TOKEN");
        assert_eq!(
            BankError::Storage(StoreError::AccountUnavailable(3)).code(),
            "STORAGE_ERROR"
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(BankError::NotAccountOwner.http_status(), 403);
        assert_eq!(BankError::AccountNotFound(9).http_status(), 404);
        assert_eq!(BankError::ExpiredRefreshToken.http_status(), 401);
        assert_eq!(
            BankError::Storage(StoreError::UniqueViolation("accounts_owner_currency_key".into()))
                .http_status(),
            409
        );
        assert_eq!(BankError::Internal("boom".into()).http_status(), 500);
    }

    #[test]
    fn test_display_echoes_ids() {
        let err = BankError::SameAccountTransfer { from: 7, to: 7 };
        assert_eq!(
            err.to_string(),
            "can't transfer to the same account, from_account_id=7, to_account_id=7"
        );

        let err = BankError::CurrencyMismatch {
            from: Currency::Usd,
            to: Currency::Idr,
        };
        assert_eq!(
            err.to_string(),
            "currency mismatch from_account.currency=USD, to_account.currency=IDR"
        );
    }

    #[test]
    fn test_storage_error_passes_through_display() {
        let err: BankError = StoreError::AccountUnavailable(42).into();
        assert_eq!(err.to_string(), "Account 42 is no longer available for transfer");
    }
}
