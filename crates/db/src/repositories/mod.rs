//! Repository abstractions for data access.
//!
//! Repositories provide a typed interface over the document store. Every
//! user-owned record carries a `user_id` field, and every lookup of such a
//! record is scoped to its owner.

pub mod budget;
pub mod expense;
pub mod password_reset;
pub mod profile;
pub mod session;
pub mod user;

pub use budget::BudgetRepository;
pub use expense::ExpenseRepository;
pub use password_reset::{PasswordResetRepository, RESET_TOKEN_TTL_MINUTES};
pub use profile::ProfileRepository;
pub use session::{SessionRecord, SessionRepository};
pub use user::{UserRecord, UserRepository};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use spendwise_core::ingest::fields;
use spendwise_shared::types::UserId;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{Document, Query};

/// Collection names.
pub mod collections {
    /// User accounts.
    pub const USERS: &str = "users";
    /// Per-user settings.
    pub const PROFILES: &str = "profiles";
    /// Refresh-token sessions.
    pub const SESSIONS: &str = "sessions";
    /// Password reset tokens.
    pub const PASSWORD_RESETS: &str = "password_resets";
    /// Expense records.
    pub const EXPENSES: &str = "expenses";
    /// Budget records.
    pub const BUDGETS: &str = "budgets";
}

/// Hashes a token for storage.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn owner_value(user_id: UserId) -> Value {
    Value::String(user_id.to_string())
}

fn owned_by(user_id: UserId) -> Query {
    Query::new().filter_eq(fields::USER_ID, owner_value(user_id))
}

fn is_owned_by(doc: &Document, user_id: UserId) -> bool {
    doc.get(fields::USER_ID) == Some(&owner_value(user_id))
}

// Fixed-width UTC so stored timestamps order as strings.
fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

fn read_timestamp(doc: &Document, field: &str) -> Result<DateTime<Utc>, StoreError> {
    doc.get_str(field)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| corrupt(doc, field))
}

fn read_owner(doc: &Document) -> Result<UserId, StoreError> {
    doc.get_str(fields::USER_ID)
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(UserId::from_uuid)
        .ok_or_else(|| corrupt(doc, fields::USER_ID))
}

fn corrupt(doc: &Document, field: &str) -> StoreError {
    StoreError::Corrupt {
        id: doc.id,
        reason: format!("missing or invalid `{field}`"),
    }
}
