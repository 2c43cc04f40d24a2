//! Budgets and budget status calculation.

pub mod error;
pub mod status;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use status::{
    OVER_THRESHOLD, WARNING_THRESHOLD, calculate_budget_status, calculate_budget_status_now,
    is_attributed,
};
pub use types::{Budget, BudgetHealth, BudgetPeriod, BudgetStatus, MAX_NOTES_LENGTH, NewBudget};
