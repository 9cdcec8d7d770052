//! Bank users: registration, lookup and profile updates

pub mod models;
pub mod service;

pub use models::{ProfileUpdate, User, UserResponse};
pub use service::UserService;
