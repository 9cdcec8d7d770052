//! Login and Session Renewal Engine
//!
//! Login mints an access/refresh token pair and persists a session keyed by
//! the refresh token's id. Renewal never rotates the refresh token; it only
//! mints a fresh access token once every session check has passed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::models::{
    ClientMeta, CreateSessionParams, LoginResponse, RenewAccessTokenResponse, Session,
};
use super::password::verify_password;
use super::token::{JwtMaker, TokenKind, TokenPayload};
use crate::error::BankError;
use crate::store::{SessionStore, UserStore};
use crate::user::models::UserResponse;

pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    jwt: Arc<JwtMaker>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        jwt: Arc<JwtMaker>,
    ) -> Self {
        Self {
            users,
            sessions,
            jwt,
        }
    }

    /// Verify credentials and open a new session
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        client: ClientMeta,
    ) -> Result<LoginResponse, BankError> {
        let user = self.users.get_user(username).await?;
        let authenticated = match &user {
            Some(user) => verify_password(password, &user.hashed_password)?,
            None => false,
        };
        let Some(user) = user.filter(|_| authenticated) else {
            warn!(
                component = "auth",
                action = "login",
                username,
                "invalid credentials"
            );
            return Err(BankError::InvalidCredentials);
        };

        let (access_token, access_payload) = self.jwt.create_access_token(&user.username)?;
        let (refresh_token, refresh_payload) = self.jwt.create_refresh_token(&user.username)?;

        let session = self
            .sessions
            .create_session(CreateSessionParams {
                id: refresh_payload.id(),
                username: user.username.clone(),
                refresh_token: refresh_token.clone(),
                client,
                expires_at: refresh_payload.expires_at(),
            })
            .await?;

        info!(
            session_id = %session.id,
            username = %user.username,
            client_ip = %session.client_ip,
            "login succeeded"
        );

        Ok(LoginResponse {
            session_id: session.id,
            access_token,
            access_token_expires_at: access_payload.expires_at(),
            refresh_token,
            refresh_token_expires_at: refresh_payload.expires_at(),
            user: UserResponse::from(&user),
        })
    }

    /// Exchange a refresh token for a new access token
    pub async fn renew_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<RenewAccessTokenResponse, BankError> {
        // Signature and expiry first; storage is not touched for a bad token
        let payload = self.jwt.verify_kind(refresh_token, TokenKind::Refresh)?;

        let session = self
            .sessions
            .get_session(payload.id())
            .await?
            .ok_or_else(|| {
                warn!(
                    component = "auth",
                    action = "renew",
                    session_id = %payload.id(),
                    "session not found"
                );
                BankError::InvalidToken
            })?;

        check_session(&session, &payload, refresh_token).inspect_err(|e| {
            warn!(
                component = "auth",
                action = "renew",
                session_id = %session.id,
                username = %session.username,
                error = %e,
                "renewal rejected"
            )
        })?;

        let (access_token, access_payload) = self.jwt.create_access_token(&session.username)?;

        info!(session_id = %session.id, username = %session.username, "access token renewed");
        Ok(RenewAccessTokenResponse {
            access_token,
            access_token_expires_at: access_payload.expires_at(),
        })
    }
}

/// Session state checks, first failure wins
fn check_session(
    session: &Session,
    payload: &TokenPayload,
    presented: &str,
) -> Result<(), BankError> {
    if session.is_blocked {
        return Err(BankError::BlockedRefreshToken);
    }
    if Utc::now() > session.expires_at {
        return Err(BankError::ExpiredRefreshToken);
    }
    if session.username != payload.username() {
        return Err(BankError::MismatchedRefreshTokens);
    }
    if session.refresh_token != presented {
        return Err(BankError::MismatchedRefreshTokens);
    }
    Ok(())
}
