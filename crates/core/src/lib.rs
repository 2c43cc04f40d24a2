//! Core business logic for Spendwise.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `category` - The fixed set of spending categories
//! - `expense` - Expense records, validation, filtering and sorting
//! - `budget` - Budgets and the budget status calculator
//! - `ingest` - Normalization of raw stored documents into domain types
//! - `analytics` - Spending aggregates for the dashboard and analytics views
//! - `export` - CSV export of expenses
//! - `auth` - Password hashing and credential rules
//! - `profile` - Per-user settings

pub mod analytics;
pub mod auth;
pub mod budget;
pub mod category;
pub mod expense;
pub mod export;
pub mod ingest;
pub mod profile;
