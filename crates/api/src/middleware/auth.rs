//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::{AppState, error::ApiError};
use spendwise_shared::{Claims, TokenKind, types::UserId};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware that validates access tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates it as an access token (refresh tokens are rejected)
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::unauthorized("Authorization header with Bearer token is required")
            .into_response();
    };

    match state.jwt_service.validate_kind(token, TokenKind::Access) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            ApiError::from(e).into_response()
        }
    }
}

/// Extractor for the authenticated user.
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let user_id = user.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0.user_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
