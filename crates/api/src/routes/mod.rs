//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod analytics;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod health;
pub mod me;

/// Creates the API router. Everything except health and `/auth/*` needs a bearer token.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(categories::routes())
        .merge(me::routes())
        .merge(expenses::routes())
        .merge(budgets::routes())
        .merge(analytics::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
