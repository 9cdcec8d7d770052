//! Authentication
//!
//! - `token`: JWT Token Authority (access and refresh tokens)
//! - `password`: Argon2 password hashing
//! - `service`: login and the Session Renewal Engine

pub mod models;
pub mod password;
pub mod service;
pub mod token;

pub use models::{ClientMeta, LoginResponse, RenewAccessTokenResponse, Session};
pub use service::AuthService;
pub use token::{JwtMaker, TokenKind, TokenPayload};
