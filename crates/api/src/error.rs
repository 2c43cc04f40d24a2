//! Mapping of domain and storage errors onto HTTP responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use spendwise_core::auth::PasswordError;
use spendwise_core::budget::BudgetError;
use spendwise_core::expense::ExpenseError;
use spendwise_core::export::ExportError;
use spendwise_db::StoreError;
use spendwise_shared::{AppError, JwtError};

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `NOT_FOUND`.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// An error returned from a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 404 with `message`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// 400 with `message`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 401 with `message`.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.0.error_code(),
            message: self.0.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::not_found("Resource not found"),
            StoreError::Conflict(msg) => Self(AppError::Conflict(msg)),
            other => Self(AppError::Storage(other.to_string())),
        }
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort(_) => Self::validation(err.to_string()),
            other => Self(AppError::Internal(other.to_string())),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::unauthorized("Token has expired"),
            JwtError::EncodingError(msg) => Self(AppError::Internal(msg)),
            JwtError::DecodingError(_) | JwtError::Invalid => {
                Self::unauthorized("Invalid or malformed token")
            }
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}
