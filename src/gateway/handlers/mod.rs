//! HTTP handlers
//!
//! Handlers translate between the wire and the services: they extract the
//! caller's verified `TokenPayload`, pass it explicitly, and map `BankError`
//! into the response envelope.

pub mod account;
pub mod health;
pub mod transfer;
pub mod user;

pub use account::*;
pub use health::*;
pub use transfer::*;
pub use user::*;
