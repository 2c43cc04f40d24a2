//! Dashboard and analytics routes.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use spendwise_core::analytics::{
    AnalyticsReport, DashboardSummary, DateWindow, TimeRange, build_analytics, build_dashboard,
};
use spendwise_db::{BudgetRepository, ExpenseRepository};

/// Creates the analytics routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(analytics))
        .route("/dashboard", get(dashboard))
}

/// Query string for `/analytics`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyticsQuery {
    /// Relative range, `month` when absent.
    pub range: TimeRange,
}

/// Query string for `/dashboard`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardQuery {
    /// First day, defaults to the start of the current month.
    pub from: Option<NaiveDate>,
    /// Last day, defaults to the end of the current month.
    pub to: Option<NaiveDate>,
}

impl DashboardQuery {
    fn window(&self, today: NaiveDate) -> DateWindow {
        let month = DateWindow::month_of(today);
        DateWindow::new(self.from.unwrap_or(month.from), self.to.unwrap_or(month.to))
    }
}

/// GET /analytics?range=
async fn analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> ApiResult<Json<AnalyticsReport>> {
    let Query(query) = query?;
    let expenses = ExpenseRepository::new(state.store.clone()).list_all(auth.user_id());
    Ok(Json(build_analytics(
        &expenses,
        query.range,
        Utc::now().date_naive(),
    )))
}

/// GET /dashboard?from=&to=
async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> ApiResult<Json<DashboardSummary>> {
    let Query(query) = query?;
    let today = Utc::now().date_naive();

    let expenses = ExpenseRepository::new(state.store.clone()).list_all(auth.user_id());
    let budgets = BudgetRepository::new(state.store.clone()).list(auth.user_id());

    Ok(Json(build_dashboard(
        query.window(today),
        &expenses,
        &budgets,
        today,
    )))
}
