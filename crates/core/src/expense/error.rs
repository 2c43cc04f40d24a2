//! Expense error types.

use thiserror::Error;

/// Expense validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Category is required.
    #[error("Category is required")]
    EmptyCategory,

    /// Category is not one of the known categories.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Name exceeds the maximum length.
    #[error("Name must be at most {0} characters")]
    NameTooLong(usize),

    /// Description exceeds the maximum length.
    #[error("Description must be at most {0} characters")]
    DescriptionTooLong(usize),
}
