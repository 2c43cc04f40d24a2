//! Budget error types.

use thiserror::Error;

/// Budget validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Target amount must be greater than zero.
    #[error("Budget amount must be greater than zero")]
    NonPositiveAmount,

    /// End date lies before the start date.
    #[error("End date cannot be before start date")]
    EndBeforeStart,

    /// Category is not one of the known categories.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Notes exceed the maximum length.
    #[error("Notes must be at most {0} characters")]
    NotesTooLong(usize),
}
