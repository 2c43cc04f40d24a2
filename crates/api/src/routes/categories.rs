//! The fixed expense category list.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;
use spendwise_core::category::{CATEGORIES, FALLBACK_CATEGORY};

/// Category list response.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    /// Every accepted category, in display order.
    pub categories: &'static [&'static str],
    /// Category used for uncategorized spending in reports.
    pub fallback: &'static str,
}

async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: &CATEGORIES,
        fallback: FALLBACK_CATEGORY,
    })
}

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories))
}
