//! Gateway types module
//!
//! ## Input Types
//! - [`ValidatedJson`] / [`ValidatedQuery`]: extractors that run `validator` rules
//! - Request DTOs for users, tokens, accounts and transfers
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: error envelope, built from `BankError`

pub mod request;
pub mod response;

pub use request::{
    CreateAccountRequest, CreateTransferRequest, CreateUserRequest, LoginUserRequest,
    PaginationQuery, RenewAccessTokenRequest, UpdateUserRequest, ValidatedJson, ValidatedQuery,
};
pub use response::{ApiError, ApiResponse, ApiResult, created, error_codes, ok};
