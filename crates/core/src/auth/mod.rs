//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Credential rules applied at sign-up and password change

mod password;

pub use password::{PasswordError, hash_password, verify_password};

/// Minimum number of characters in a password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum number of characters in a display name.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Checks a new password against the password policy.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` if the password has fewer than
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Normalizes an email address for storage and lookup.
///
/// Returns `None` if the address is obviously malformed.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || email.contains(' ') {
        return None;
    }
    Some(email)
}

/// Trims a display name and checks its length.
///
/// Returns `None` for empty or overly long names.
#[must_use]
pub fn normalize_display_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("12345678").is_ok());
        assert!(matches!(
            validate_password("1234567"),
            Err(PasswordError::TooShort(8))
        ));
    }

    #[rstest]
    #[case("Alice@Example.COM", Some("alice@example.com"))]
    #[case("  bob@example.com ", Some("bob@example.com"))]
    #[case("no-at-sign", None)]
    #[case("@example.com", None)]
    #[case("user@", None)]
    #[case("a@b@c", None)]
    #[case("a b@c.d", None)]
    fn test_normalize_email(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_email(input).as_deref(), expected);
    }

    #[test]
    fn test_normalize_display_name() {
        assert_eq!(normalize_display_name("  Ann ").as_deref(), Some("Ann"));
        assert!(normalize_display_name("   ").is_none());
        assert!(normalize_display_name(&"x".repeat(101)).is_none());
    }
}
