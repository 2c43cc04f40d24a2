//! Expense records, validation, filtering and sorting.

pub mod error;
pub mod query;
pub mod types;

pub use error::ExpenseError;
pub use query::{
    ExpenseFilter, QUICK_SEARCH_LIMIT, SortDirection, SortField, matches_search, quick_search,
    sort_expenses,
};
pub use types::{Expense, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, NewExpense};
