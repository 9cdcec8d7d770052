use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::BankError;

/// Hash a password with Argon2id and a fresh random salt (PHC string format)
pub fn hash_password(password: &str) -> Result<String, BankError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BankError::Internal(format!("Hashing failed: {}", e)))
}

/// Returns `Ok(false)` on mismatch; `Err` only if the stored hash is malformed
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, BankError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| BankError::Internal(format!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
