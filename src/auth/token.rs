//! Token Authority
//!
//! Issues and verifies HS256-signed JWTs. Two kinds exist: short-lived access
//! tokens that authorize API calls and long-lived refresh tokens that only
//! authorize session renewal. A `TokenPayload` can only be obtained from
//! `JwtMaker`, either by minting or by verifying a token.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::error::BankError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Verified token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(rename = "jti")]
    id: Uuid,
    #[serde(rename = "sub")]
    username: String,
    kind: TokenKind,
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    issued_at: DateTime<Utc>,
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    expires_at: DateTime<Utc>,
}

impl TokenPayload {
    /// Unique token id; for refresh tokens this is also the session id
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// JWT signer/verifier holding the symmetric key
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
}

/// Token lifetime from a configured number of seconds
fn ttl_from_secs(secs: u64) -> Result<TimeDelta, BankError> {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| BankError::Internal(format!("token duration out of range: {}s", secs)))
}

impl JwtMaker {
    pub fn new(config: &TokenConfig) -> Result<Self, BankError> {
        Ok(Self::with_ttls(
            &config.symmetric_key,
            ttl_from_secs(config.access_token_duration_secs)?,
            ttl_from_secs(config.refresh_token_duration_secs)?,
        ))
    }

    pub(crate) fn with_ttls(secret: &str, access_ttl: TimeDelta, refresh_ttl: TimeDelta) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn create_access_token(&self, username: &str) -> Result<(String, TokenPayload), BankError> {
        self.create_token(username, TokenKind::Access, self.access_ttl)
    }

    pub fn create_refresh_token(
        &self,
        username: &str,
    ) -> Result<(String, TokenPayload), BankError> {
        self.create_token(username, TokenKind::Refresh, self.refresh_ttl)
    }

    fn create_token(
        &self,
        username: &str,
        kind: TokenKind,
        ttl: TimeDelta,
    ) -> Result<(String, TokenPayload), BankError> {
        // JWT timestamps carry whole seconds
        let issued_at = Utc::now().trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| BankError::Internal("token expiry out of range".to_string()))?;
        let payload = TokenPayload {
            id: Uuid::new_v4(),
            username: username.to_string(),
            kind,
            issued_at,
            expires_at,
        };

        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| BankError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok((token, payload))
    }

    /// Check signature and expiry. Any failure is `InvalidToken`.
    pub fn verify_token(&self, token: &str) -> Result<TokenPayload, BankError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<TokenPayload>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token verification failed");
                BankError::InvalidToken
            })
    }

    /// Verify and require a specific token kind
    pub fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<TokenPayload, BankError> {
        let payload = self.verify_token(token)?;
        if payload.kind != kind {
            tracing::debug!(expected = ?kind, got = ?payload.kind, "token kind mismatch");
            return Err(BankError::InvalidToken);
        }
        Ok(payload)
    }
}
