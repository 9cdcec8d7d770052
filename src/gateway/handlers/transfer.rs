//! Transfer handlers

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
};

use super::super::state::AppState;
use super::super::types::{
    ApiResult, CreateTransferRequest, PaginationQuery, ValidatedJson, ValidatedQuery, created, ok,
};
use crate::auth::TokenPayload;
use crate::transfer::{Pagination, Transfer, TransferTxResult};

/// Move funds from one of the caller's accounts to any account
///
/// POST /api/v1/transfers
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = CreateTransferRequest,
    responses(
        (status = 201, description = "Transfer committed", body = TransferTxResult),
        (status = 400, description = "Same account, currency mismatch or invalid amount"),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Source account belongs to another user"),
        (status = 404, description = "Account not found"),
        (status = 422, description = "Account is deleted")
    ),
    security(("jwt_auth" = [])),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
    ValidatedJson(req): ValidatedJson<CreateTransferRequest>,
) -> ApiResult<TransferTxResult> {
    let result = state
        .transfers
        .transfer(&caller, req.from_account_id, req.to_account_id, req.amount)
        .await?;
    created(result)
}

/// GET /api/v1/transfers/{id}
#[utoipa::path(
    get,
    path = "/api/v1/transfers/{id}",
    params(("id" = i64, Path, description = "Transfer ID")),
    responses(
        (status = 200, description = "Transfer", body = Transfer),
        (status = 403, description = "Caller owns neither account"),
        (status = 404, description = "Transfer not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Transfer"
)]
pub async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
    Path(id): Path<i64>,
) -> ApiResult<Transfer> {
    ok(state.transfers.get_transfer(&caller, id).await?)
}

/// Transfers in and out of an account, most recent first
///
/// GET /api/v1/accounts/{id}/transfers?page_id=1&page_size=10
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}/transfers",
    params(("id" = i64, Path, description = "Account ID"), PaginationQuery),
    responses(
        (status = 200, description = "One page of transfers", body = Vec<Transfer>),
        (status = 400, description = "Invalid account id or pagination"),
        (status = 403, description = "Account belongs to another user")
    ),
    security(("jwt_auth" = [])),
    tag = "Transfer"
)]
pub async fn list_account_transfers(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
    Path(id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> ApiResult<Vec<Transfer>> {
    let page = Pagination::new(query.page_id, query.page_size)?;
    ok(state.transfers.get_list_transfer(&caller, id, page).await?)
}
