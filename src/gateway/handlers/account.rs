//! Account handlers (open, list, soft-delete, restore)

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
};

use super::super::state::AppState;
use super::super::types::{ApiResult, CreateAccountRequest, ValidatedJson, created, ok};
use crate::account::Account;
use crate::auth::TokenPayload;
use crate::currency::Currency;

/// Open an account for the caller
///
/// POST /api/v1/accounts
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Unsupported currency"),
        (status = 401, description = "Authentication failed"),
        (status = 409, description = "Caller already has an account in this currency")
    ),
    security(("jwt_auth" = [])),
    tag = "Account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> ApiResult<Account> {
    let currency: Currency = req.currency.parse()?;
    let account = state.accounts.create_account(&caller, currency).await?;
    created(account)
}

/// GET /api/v1/accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    responses(
        (status = 200, description = "Caller's active accounts", body = Vec<Account>),
        (status = 401, description = "Authentication failed")
    ),
    security(("jwt_auth" = [])),
    tag = "Account"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
) -> ApiResult<Vec<Account>> {
    ok(state.accounts.list_accounts(&caller).await?)
}

/// GET /api/v1/accounts/deleted
#[utoipa::path(
    get,
    path = "/api/v1/accounts/deleted",
    responses(
        (status = 200, description = "Caller's soft-deleted accounts", body = Vec<Account>),
        (status = 401, description = "Authentication failed")
    ),
    security(("jwt_auth" = [])),
    tag = "Account"
)]
pub async fn list_deleted_accounts(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
) -> ApiResult<Vec<Account>> {
    ok(state.accounts.list_deleted_accounts(&caller).await?)
}

/// GET /api/v1/accounts/{id}
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account details", body = Account),
        (status = 403, description = "Account belongs to another user"),
        (status = 404, description = "Account not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
    Path(id): Path<i64>,
) -> ApiResult<Account> {
    ok(state.accounts.get_account(&caller, id).await?)
}

/// DELETE /api/v1/accounts/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account soft-deleted"),
        (status = 403, description = "Account belongs to another user"),
        (status = 404, description = "Account not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Account"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.accounts.delete_account(&caller, id).await?;
    ok(())
}

/// POST /api/v1/accounts/{id}/restore
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{id}/restore",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account restored"),
        (status = 403, description = "Account belongs to another user"),
        (status = 404, description = "Account not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Account"
)]
pub async fn restore_account(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.accounts.restore_account(&caller, id).await?;
    ok(())
}
