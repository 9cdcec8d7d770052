use std::sync::Arc;

use tracing::{info, warn};

use super::models::{CreateUserParams, ProfileUpdate, UpdateUserParams, User};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenPayload;
use crate::error::{BankError, StoreError};
use crate::store::UserStore;

pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Register a new user
    pub async fn register(
        &self,
        username: &str,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, BankError> {
        let hashed_password = hash_password(password)?;

        let user = self
            .store
            .create_user(CreateUserParams {
                username: username.to_string(),
                hashed_password,
                full_name: full_name.to_string(),
                email: email.to_string(),
            })
            .await
            .map_err(|e| {
                warn!(
                    component = "user",
                    action = "register",
                    username,
                    error = %e,
                    "registration failed"
                );
                match e {
                    StoreError::UniqueViolation(_) => BankError::UserAlreadyExists,
                    other => BankError::Storage(other),
                }
            })?;

        info!(username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn get_user(&self, username: &str) -> Result<User, BankError> {
        self.store
            .get_user(username)
            .await?
            .ok_or_else(|| BankError::UserNotFound(username.to_string()))
    }

    /// Update the caller's own profile
    pub async fn update_user(
        &self,
        caller: &TokenPayload,
        update: ProfileUpdate,
    ) -> Result<User, BankError> {
        let username = caller.username();
        let current = self.get_user(username).await?;

        let reject = |err: BankError| {
            warn!(
                component = "user",
                action = "update",
                username,
                error = %err,
                "update rejected"
            );
            err
        };

        if update.email.as_deref() == Some(current.email.as_str()) {
            return Err(reject(BankError::EmailSameAsOld));
        }

        let hashed_password = match update.new_password {
            Some(new_password) => {
                let old_password = update.old_password.unwrap_or_default();
                if !verify_password(&old_password, &current.hashed_password)? {
                    return Err(reject(BankError::PasswordWrong));
                }
                Some(hash_password(&new_password)?)
            }
            None => None,
        };

        let user = self
            .store
            .update_user(UpdateUserParams {
                username: username.to_string(),
                full_name: update.full_name,
                email: update.email,
                hashed_password,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => reject(BankError::UserAlreadyExists),
                other => BankError::Storage(other),
            })?
            .ok_or_else(|| BankError::UserNotFound(username.to_string()))?;

        info!(username, "user updated");
        Ok(user)
    }
}
