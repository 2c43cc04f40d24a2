//! Storage layer: an in-memory document store and repositories.
//!
//! This crate provides:
//! - A concurrent document store with owner-scoped queries and JSON snapshots
//! - Repository abstractions for users, profiles, sessions, password resets,
//!   expenses, and budgets

pub mod error;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use repositories::{
    BudgetRepository, ExpenseRepository, PasswordResetRepository, ProfileRepository,
    SessionRepository, UserRepository,
};
pub use store::{Collection, Document, DocumentStore, Filter, Query, SortOrder};
pub use repositories::{SessionRecord, UserRecord};
