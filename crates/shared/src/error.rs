//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found (or owned by someone else).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Document store error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message that is safe to show to API clients.
    ///
    /// Server-side failures are reported generically; their detail only goes to the log.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Storage(_) | Self::Internal(_) => "An error occurred".to_string(),
        }
    }

    /// Returns true if this error represents a server-side failure.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
