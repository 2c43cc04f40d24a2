//! Budget routes: CRUD and computed spending status.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use spendwise_core::analytics::current_month_budgets;
use spendwise_core::budget::{Budget, BudgetStatus, NewBudget, calculate_budget_status};
use spendwise_db::{BudgetRepository, ExpenseRepository};
use spendwise_shared::types::{BudgetId, UserId};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/status", get(all_statuses))
        .route("/budgets/current-month", get(current_month_statuses))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{budget_id}/status", get(budget_status))
}

// ============================================================================
// Response Types
// ============================================================================

/// Budget listing.
#[derive(Debug, Serialize)]
pub struct BudgetListResponse {
    /// Budgets, latest start date first.
    pub budgets: Vec<Budget>,
}

/// Computed statuses for several budgets.
#[derive(Debug, Serialize)]
pub struct BudgetStatusListResponse {
    /// Date the statuses were computed for.
    pub as_of: NaiveDate,
    /// One status per budget.
    pub statuses: Vec<BudgetStatus>,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_budget_id(raw: &str) -> ApiResult<BudgetId> {
    BudgetId::from_str(raw).map_err(|_| ApiError::not_found("Budget not found"))
}

fn repo(state: &AppState) -> BudgetRepository {
    BudgetRepository::new(state.store.clone())
}

fn statuses(state: &AppState, user_id: UserId, budgets: &[Budget], today: NaiveDate) -> BudgetStatusListResponse {
    let expenses = ExpenseRepository::new(state.store.clone()).list_all(user_id);
    BudgetStatusListResponse {
        as_of: today,
        statuses: budgets
            .iter()
            .map(|b| calculate_budget_status(b, &expenses, today))
            .collect(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /budgets
async fn list_budgets(State(state): State<AppState>, auth: AuthUser) -> Json<BudgetListResponse> {
    Json(BudgetListResponse {
        budgets: repo(&state).list(auth.user_id()),
    })
}

/// POST /budgets
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<NewBudget>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate()?;

    let created = repo(&state).create(auth.user_id(), &payload)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /budgets/{budget_id}
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<String>,
) -> ApiResult<Json<Budget>> {
    let id = parse_budget_id(&budget_id)?;
    repo(&state)
        .find_by_id(auth.user_id(), id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Budget not found"))
}

/// PUT /budgets/{budget_id} - Full replacement.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<String>,
    payload: Result<Json<NewBudget>, JsonRejection>,
) -> ApiResult<Json<Budget>> {
    let id = parse_budget_id(&budget_id)?;
    let Json(payload) = payload?;
    payload.validate()?;

    repo(&state)
        .update(auth.user_id(), id, &payload)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Budget not found"))
}

/// DELETE /budgets/{budget_id}
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_budget_id(&budget_id)?;
    if repo(&state).delete(auth.user_id(), id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Budget not found"))
    }
}

/// GET /budgets/{budget_id}/status
async fn budget_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<String>,
) -> ApiResult<Json<BudgetStatus>> {
    let id = parse_budget_id(&budget_id)?;
    let budget = repo(&state)
        .find_by_id(auth.user_id(), id)
        .ok_or_else(|| ApiError::not_found("Budget not found"))?;

    let expenses = ExpenseRepository::new(state.store.clone()).list_all(auth.user_id());
    Ok(Json(calculate_budget_status(
        &budget,
        &expenses,
        Utc::now().date_naive(),
    )))
}

/// GET /budgets/status - Status of every budget.
async fn all_statuses(State(state): State<AppState>, auth: AuthUser) -> Json<BudgetStatusListResponse> {
    let budgets = repo(&state).list(auth.user_id());
    Json(statuses(&state, auth.user_id(), &budgets, Utc::now().date_naive()))
}

/// GET /budgets/current-month - Status of monthly budgets active this month.
async fn current_month_statuses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<BudgetStatusListResponse> {
    let today = Utc::now().date_naive();
    let budgets = current_month_budgets(&repo(&state).list(auth.user_id()), today);
    Json(statuses(&state, auth.user_id(), &budgets, today))
}
