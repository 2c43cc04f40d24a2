//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

/// Distinguishes short-lived access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Bearer token for API requests.
    Access,
    /// Token that can only be exchanged for a new access token.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Token kind.
    pub typ: TokenKind,
    /// Unique token ID.
    pub jti: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: UserId, typ: TokenKind, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.into_inner(),
            typ,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }

    /// Returns true for access tokens.
    #[must_use]
    pub fn is_access(&self) -> bool {
        self.typ == TokenKind::Access
    }
}

/// Token pair returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: u64,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
    /// Name shown in the UI.
    pub display_name: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: u64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// User ID.
    pub id: UserId,
    /// User email.
    pub email: String,
    /// Display name.
    pub display_name: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// Refresh response: a fresh access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Access token expiration in seconds.
    pub expires_in: u64,
}

/// Logout request.
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    /// The refresh token to invalidate.
    pub refresh_token: String,
}

/// Request a password reset email.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetRequest {
    /// Account email.
    pub email: String,
}

/// Complete a password reset.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetConfirm {
    /// Token from the reset email.
    pub token: String,
    /// The new password.
    pub new_password: String,
}

/// Change the password of the signed-in user.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password, re-checked before the change.
    pub current_password: String,
    /// The new password.
    pub new_password: String,
}

/// Update the display name.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub display_name: String,
}

/// Generic message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
