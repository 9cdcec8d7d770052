//! Request DTOs and validating extractors
//!
//! Handlers never see a body or query string that failed deserialization or
//! `validator` rules; both are rejected with the standard error envelope.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::response::ApiError;
use crate::currency::Currency;
use crate::transfer::models::MAX_PAGE_SIZE;
use crate::user::models::ProfileUpdate;

// ============================================================================
// Extractors
// ============================================================================

/// JSON body that passed its `Validate` rules
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string that passed its `Validate` rules
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value): Query<T> = Query::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid query: {}", e.body_text())))?;
        value.validate()?;
        Ok(Self(value))
    }
}

// ============================================================================
// Field rules
// ============================================================================

fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric"))
    }
}

fn validate_currency(value: &str) -> Result<(), ValidationError> {
    if Currency::is_supported(value) {
        Ok(())
    } else {
        Err(ValidationError::new("currency"))
    }
}

// ============================================================================
// User
// ============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "alice01")]
    #[validate(length(min = 6, max = 16), custom(function = "validate_alphanumeric"))]
    pub username: String,
    #[schema(example = "Alice Liddell")]
    #[validate(length(min = 1))]
    pub full_name: String,
    #[schema(example = "alice@example.com")]
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 16))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirm: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserRequest {
    #[schema(example = "alice01")]
    #[validate(length(min = 6, max = 16), custom(function = "validate_alphanumeric"))]
    pub username: String,
    #[validate(length(min = 6, max = 16))]
    pub password: String,
}

/// Omitted fields stay unchanged; `new_password` needs `old_password`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 16))]
    pub old_password: Option<String>,
    #[validate(length(min = 6, max = 16))]
    pub new_password: Option<String>,
}

impl From<UpdateUserRequest> for ProfileUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
            old_password: req.old_password,
            new_password: req.new_password,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RenewAccessTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

// ============================================================================
// Account / Transfer
// ============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(example = "USD")]
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTransferRequest {
    #[validate(range(min = 1))]
    pub from_account_id: i64,
    #[validate(range(min = 1))]
    pub to_account_id: i64,
    /// Minor units
    #[validate(range(min = 1))]
    pub amount: i64,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct PaginationQuery {
    /// 1-based page number
    #[validate(range(min = 1))]
    pub page_id: i64,
    #[validate(range(min = 1, max = MAX_PAGE_SIZE))]
    pub page_size: i64,
}
