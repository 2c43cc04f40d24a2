//! Password hashing with Argon2id.
//!
//! Uses the recommended Argon2id variant with secure defaults.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password does not meet the length requirement.
    #[error("password must be at least {0} characters")]
    TooShort(usize),
}

/// Hashes a password using Argon2id.
///
/// # Returns
///
/// The hashed password as a PHC string format.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use spendwise_core::auth::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::HashError(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a hash.
///
/// Returns `true` if the password matches, `false` otherwise.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash format is invalid.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
///
/// # Example
///
/// ```
/// use spendwise_core::auth::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// assert!(!verify_password("wrong_password", &hash).unwrap());
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "test_password_123!";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, password);
    }

    #[test]
    fn test_verify_correct_and_wrong_password() {
        let hash = hash_password("correct_password").unwrap();

        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_fresh_salt() {
        let hash1 = hash_password("password1").unwrap();
        let hash2 = hash_password("password1").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }
}
