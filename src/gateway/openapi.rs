//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::Account;
use crate::auth::{LoginResponse, RenewAccessTokenResponse};
use crate::currency::Currency;
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    CreateAccountRequest, CreateTransferRequest, CreateUserRequest, LoginUserRequest,
    RenewAccessTokenRequest, UpdateUserRequest,
};
use crate::transfer::{Entry, Transfer, TransferTxResult};
use crate::user::UserResponse;

/// Bearer access-token security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token from /api/v1/users/login or /api/v1/tokens/renew",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bank API",
        version = "1.0.0",
        description = "Accounts, owner-checked funds transfers and refresh-token sessions.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::create_user,
        crate::gateway::handlers::login_user,
        crate::gateway::handlers::get_me,
        crate::gateway::handlers::update_me,
        crate::gateway::handlers::renew_access_token,
        crate::gateway::handlers::create_account,
        crate::gateway::handlers::list_accounts,
        crate::gateway::handlers::list_deleted_accounts,
        crate::gateway::handlers::get_account,
        crate::gateway::handlers::delete_account,
        crate::gateway::handlers::restore_account,
        crate::gateway::handlers::create_transfer,
        crate::gateway::handlers::get_transfer,
        crate::gateway::handlers::list_account_transfers,
    ),
    components(
        schemas(
            HealthResponse,
            Currency,
            Account,
            Transfer,
            Entry,
            TransferTxResult,
            UserResponse,
            LoginResponse,
            RenewAccessTokenResponse,
            CreateUserRequest,
            LoginUserRequest,
            UpdateUserRequest,
            RenewAccessTokenRequest,
            CreateAccountRequest,
            CreateTransferRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "User", description = "Registration, login, profile and token renewal"),
        (name = "Account", description = "Account management (auth required)"),
        (name = "Transfer", description = "Funds transfers (auth required)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_generates() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Bank API");
        assert!(doc.to_json().is_ok());
    }

    #[test]
    fn test_endpoints_registered() {
        let paths = ApiDoc::openapi().paths;
        for path in [
            "/api/v1/health",
            "/api/v1/users/login",
            "/api/v1/tokens/renew",
            "/api/v1/accounts/{id}/transfers",
            "/api/v1/transfers",
        ] {
            assert!(paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_security_scheme_registered() {
        let components = ApiDoc::openapi()
            .components
            .expect("should have components");
        assert!(components.security_schemes.contains_key("jwt_auth"));
    }
}
