//! Expense routes: CRUD, filtered listing, quick search and CSV export.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::{JsonRejection, QueryRejection}},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use spendwise_core::expense::{Expense, ExpenseFilter, NewExpense, quick_search};
use spendwise_core::export::{export_filename, expenses_to_csv};
use spendwise_db::ExpenseRepository;
use spendwise_shared::types::ExpenseId;

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/search", get(search_expenses))
        .route("/expenses/export", get(export_expenses))
        .route(
            "/expenses/{expense_id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Expense listing.
#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    /// Matching expenses.
    pub expenses: Vec<Expense>,
    /// Number of expenses returned.
    pub count: usize,
}

impl From<Vec<Expense>> for ExpenseListResponse {
    fn from(expenses: Vec<Expense>) -> Self {
        Self {
            count: expenses.len(),
            expenses,
        }
    }
}

/// Query string for quick search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search term.
    #[serde(default)]
    pub q: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Malformed IDs are reported like missing records.
fn parse_expense_id(raw: &str) -> ApiResult<ExpenseId> {
    ExpenseId::from_str(raw).map_err(|_| ApiError::not_found("Expense not found"))
}

fn repo(state: &AppState) -> ExpenseRepository {
    ExpenseRepository::new(state.store.clone())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /expenses
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    filter: Result<Query<ExpenseFilter>, QueryRejection>,
) -> ApiResult<Json<ExpenseListResponse>> {
    let Query(filter) = filter?;
    let expenses = repo(&state).list(auth.user_id(), &filter);
    Ok(Json(expenses.into()))
}

/// POST /expenses
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<NewExpense>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let expense = payload.into_validated()?;

    let created = repo(&state).create(auth.user_id(), &expense)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /expenses/{expense_id}
async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<String>,
) -> ApiResult<Json<Expense>> {
    let id = parse_expense_id(&expense_id)?;
    repo(&state)
        .find_by_id(auth.user_id(), id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense not found"))
}

/// PUT /expenses/{expense_id} - Full replacement.
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<String>,
    payload: Result<Json<NewExpense>, JsonRejection>,
) -> ApiResult<Json<Expense>> {
    let id = parse_expense_id(&expense_id)?;
    let Json(payload) = payload?;
    let expense = payload.into_validated()?;

    repo(&state)
        .update(auth.user_id(), id, &expense)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense not found"))
}

/// DELETE /expenses/{expense_id}
async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_expense_id(&expense_id)?;
    if repo(&state).delete(auth.user_id(), id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Expense not found"))
    }
}

/// GET /expenses/search?q=
async fn search_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<ExpenseListResponse>> {
    let Query(query) = query?;
    let term = query.q.trim();
    if term.is_empty() {
        return Ok(Json(Vec::new().into()));
    }

    let matches = quick_search(repo(&state).list_all(auth.user_id()), term);
    debug!(user_id = %auth.user_id(), results = matches.len(), "Quick search");
    Ok(Json(matches.into()))
}

/// GET /expenses/export - CSV of the filtered listing.
async fn export_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    filter: Result<Query<ExpenseFilter>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(filter) = filter?;
    let expenses = repo(&state).list(auth.user_id(), &filter);
    let csv = expenses_to_csv(&expenses)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(Utc::now().date_naive())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
