//! Bearer-token authentication
//!
//! Verifies the access token and inserts its `TokenPayload` into the request
//! extensions. Handlers pull it out with `Extension<TokenPayload>` and pass it
//! explicitly to the services.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::state::AppState;
use super::types::{ApiError, error_codes};
use crate::auth::TokenKind;

pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            ApiError::unauthorized(error_codes::MISSING_AUTH, "Missing Authorization header")
        })?;

    // 2. "Bearer <token>", scheme is case-insensitive
    let token = match auth_header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            token.trim()
        }
        _ => {
            return Err(ApiError::unauthorized(
                error_codes::AUTH_FAILED,
                "Invalid authorization header format",
            ));
        }
    };

    // 3. Only access tokens authorize API calls
    let payload = state
        .jwt
        .verify_kind(token, TokenKind::Access)
        .map_err(|_| ApiError::unauthorized(error_codes::AUTH_FAILED, "Invalid or expired token"))?;

    request.extensions_mut().insert(payload);
    Ok(next.run(request).await)
}
