//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Bearer-token authentication middleware
//! - A uniform JSON error body

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use spendwise_db::DocumentStore;
use spendwise_shared::{EmailService, JwtService};

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Document store.
    pub store: Arc<DocumentStore>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Email service for sending emails.
    pub email_service: Arc<EmailService>,
}

impl AppState {
    /// Bundles the services handlers need.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, jwt_service: JwtService, email_service: EmailService) -> Self {
        Self {
            store,
            jwt_service: Arc::new(jwt_service),
            email_service: Arc::new(email_service),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
