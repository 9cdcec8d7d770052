//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError`: HTTP status + error code + message, rendered as `ApiResponse<()>`
//! - `error_codes`: Standard error code constants

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::error::{BankError, StoreError};

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 OK with `data`
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 Created with `data`
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

// ============================================================================
// ApiError
// ============================================================================

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn unauthorized(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }

    pub fn into_err<T>(self) -> Result<T, Self> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiResponse::<()>::error(self.code, self.msg)),
        )
            .into_response()
    }
}

impl From<BankError> for ApiError {
    fn from(err: BankError) -> Self {
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = error_codes::for_error(&err);

        // Storage internals stay in the logs
        let msg = match &err {
            BankError::Storage(StoreError::UniqueViolation(_))
            | BankError::Storage(StoreError::ForeignKeyViolation(_)) => {
                "conflicts with existing data".to_string()
            }
            BankError::Storage(StoreError::AccountUnavailable(_)) => err.to_string(),
            BankError::Storage(_) | BankError::Internal(_) => {
                tracing::error!(code = err.code(), error = %err, "request failed");
                "internal server error".to_string()
            }
            _ => err.to_string(),
        };

        Self::new(status, code, msg)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::bad_request(errors.to_string())
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    use crate::error::BankError;

    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const SAME_ACCOUNT: i32 = 1002;
    pub const CURRENCY_MISMATCH: i32 = 1003;
    pub const ACCOUNT_DELETED: i32 = 1004;
    pub const EMAIL_SAME_AS_OLD: i32 = 1005;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;
    pub const SESSION_BLOCKED: i32 = 2003;
    pub const SESSION_EXPIRED: i32 = 2004;
    pub const SESSION_MISMATCH: i32 = 2005;
    pub const PASSWORD_WRONG: i32 = 2006;

    // Permission errors (3xxx)
    pub const NOT_ACCOUNT_OWNER: i32 = 3001;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4001;
    pub const ALREADY_EXISTS: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;

    pub fn for_error(err: &BankError) -> i32 {
        use crate::error::StoreError;

        match err {
            BankError::SameAccountTransfer { .. } => SAME_ACCOUNT,
            BankError::CurrencyMismatch { .. } => CURRENCY_MISMATCH,
            BankError::AccountDeleted(_)
            | BankError::Storage(StoreError::AccountUnavailable(_)) => ACCOUNT_DELETED,
            BankError::EmailSameAsOld => EMAIL_SAME_AS_OLD,
            BankError::InvalidAccountId(_)
            | BankError::InvalidAmount(_)
            | BankError::UnsupportedCurrency(_)
            | BankError::InvalidPagination(_) => INVALID_PARAMETER,
            BankError::InvalidToken | BankError::InvalidCredentials => AUTH_FAILED,
            BankError::BlockedRefreshToken => SESSION_BLOCKED,
            BankError::ExpiredRefreshToken => SESSION_EXPIRED,
            BankError::MismatchedRefreshTokens => SESSION_MISMATCH,
            BankError::PasswordWrong => PASSWORD_WRONG,
            BankError::NotAccountOwner => NOT_ACCOUNT_OWNER,
            BankError::AccountNotFound(_)
            | BankError::TransferNotFound(_)
            | BankError::UserNotFound(_) => NOT_FOUND,
            BankError::UserAlreadyExists
            | BankError::Storage(StoreError::UniqueViolation(_))
            | BankError::Storage(StoreError::ForeignKeyViolation(_)) => ALREADY_EXISTS,
            BankError::Internal(_) | BankError::Storage(_) => INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_error_mapping() {
        let err = ApiError::from(BankError::NotAccountOwner);
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.code, error_codes::NOT_ACCOUNT_OWNER);

        let err = ApiError::from(BankError::BlockedRefreshToken);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, error_codes::SESSION_BLOCKED);
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err = ApiError::from(BankError::Storage(StoreError::Internal("lock".into())));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.msg, "internal server error");

        let err = ApiError::from(BankError::Storage(StoreError::AccountUnavailable(5)));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, error_codes::ACCOUNT_DELETED);

        let err = ApiError::from(BankError::Storage(StoreError::UniqueViolation(
            "accounts_owner_currency_key".into(),
        )));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(!err.msg.contains("accounts_owner_currency_key"));
    }

    #[test]
    fn test_error_response_has_no_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error(1001, "bad")).unwrap();
        assert_eq!(json["code"], 1001);
        assert_eq!(json["msg"], "bad");
        assert!(json.get("data").is_none());
    }
}
