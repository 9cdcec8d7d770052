//! User and session handlers (registration, login, profile, token renewal)

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Extension,
    extract::{ConnectInfo, FromRequestParts, State},
    http::{header, request::Parts},
};

use super::super::state::AppState;
use super::super::types::{
    ApiResult, CreateUserRequest, LoginUserRequest, RenewAccessTokenRequest, UpdateUserRequest,
    ValidatedJson, created, ok,
};
use crate::auth::{ClientMeta, LoginResponse, RenewAccessTokenResponse, TokenPayload};
use crate::user::UserResponse;

/// Client metadata recorded on the session at login
pub struct ClientInfo(pub ClientMeta);

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        // Proxy header first, then the socket peer
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|ip| ip.trim().to_string());
        let client_ip = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_default();

        Ok(Self(ClientMeta {
            user_agent,
            client_ip,
        }))
    }
}

/// Register a new user
///
/// POST /api/v1/users
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 409, description = "Username or email already exists")
    ),
    tag = "User"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    let user = state
        .users
        .register(&req.username, &req.full_name, &req.email, &req.password)
        .await?;
    created(UserResponse::from(&user))
}

/// Log in and open a session
///
/// POST /api/v1/users/login
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginUserRequest,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 401, description = "Invalid username or password")
    ),
    tag = "User"
)]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    ClientInfo(client): ClientInfo,
    ValidatedJson(req): ValidatedJson<LoginUserRequest>,
) -> ApiResult<LoginResponse> {
    let resp = state
        .auth
        .login(&req.username, &req.password, client)
        .await?;
    ok(resp)
}

/// Current user's profile
///
/// GET /api/v1/users/me
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Authentication failed"),
        (status = 404, description = "User not found")
    ),
    security(("jwt_auth" = [])),
    tag = "User"
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
) -> ApiResult<UserResponse> {
    let user = state.users.get_user(caller.username()).await?;
    ok(UserResponse::from(&user))
}

/// Update the current user's profile
///
/// PATCH /api/v1/users/me
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Invalid parameters or email unchanged"),
        (status = 401, description = "Authentication failed or wrong old password")
    ),
    security(("jwt_auth" = [])),
    tag = "User"
)]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<TokenPayload>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let user = state.users.update_user(&caller, req.into()).await?;
    ok(UserResponse::from(&user))
}

/// Exchange a refresh token for a new access token
///
/// POST /api/v1/tokens/renew
#[utoipa::path(
    post,
    path = "/api/v1/tokens/renew",
    request_body = RenewAccessTokenRequest,
    responses(
        (status = 200, description = "New access token", body = RenewAccessTokenResponse),
        (status = 401, description = "Invalid, blocked, expired or mismatched refresh token")
    ),
    tag = "User"
)]
pub async fn renew_access_token(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RenewAccessTokenRequest>,
) -> ApiResult<RenewAccessTokenResponse> {
    let resp = state.auth.renew_access_token(&req.refresh_token).await?;
    ok(resp)
}
