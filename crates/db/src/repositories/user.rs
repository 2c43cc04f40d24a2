//! User repository.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use spendwise_shared::types::UserId;
use tracing::info;

use super::{collections, corrupt};
use crate::error::StoreError;
use crate::store::{Collection, Document, DocumentStore, Query};

const EMAIL: &str = "email";
const PASSWORD_HASH: &str = "password_hash";
const DISPLAY_NAME: &str = "display_name";

/// A stored user account.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// User ID.
    pub id: UserId,
    /// Lowercased email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Display name.
    pub display_name: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[hidden]")
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl UserRecord {
    fn from_document(doc: &Document) -> Result<Self, StoreError> {
        let text = |field: &str| {
            doc.get_str(field)
                .map(str::to_string)
                .ok_or_else(|| corrupt(doc, field))
        };
        Ok(Self {
            id: UserId::from_uuid(doc.id),
            email: text(EMAIL)?,
            password_hash: text(PASSWORD_HASH)?,
            display_name: doc.get_str(DISPLAY_NAME).unwrap_or_default().to_string(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    store: Arc<DocumentStore>,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn users(&self) -> Arc<Collection> {
        self.store.collection(collections::USERS)
    }

    fn by_email(email: &str) -> Query {
        Query::new().filter_eq(EMAIL, email.trim().to_lowercase())
    }

    /// Finds a user by email, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record is corrupt.
    pub fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.users()
            .find_one(&Self::by_email(email))
            .map(|doc| UserRecord::from_document(&doc))
            .transpose()
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record is corrupt.
    pub fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        self.users()
            .get(id.into_inner())
            .map(|doc| UserRecord::from_document(&doc))
            .transpose()
    }

    /// Returns true if an account uses this email.
    #[must_use]
    pub fn email_exists(&self, email: &str) -> bool {
        self.users().find_one(&Self::by_email(email)).is_some()
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email is taken.
    pub fn create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> Result<UserRecord, StoreError> {
        let email = email.trim().to_lowercase();
        if self.email_exists(&email) {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }

        let mut data = Map::new();
        data.insert(EMAIL.into(), Value::String(email));
        data.insert(PASSWORD_HASH.into(), Value::String(password_hash.to_string()));
        data.insert(DISPLAY_NAME.into(), Value::String(display_name.to_string()));

        let doc = self.users().insert(data);
        info!(user_id = %doc.id, "User created");
        UserRecord::from_document(&doc)
    }

    /// Replaces a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist.
    pub fn update_password(&self, id: UserId, password_hash: &str) -> Result<UserRecord, StoreError> {
        let doc = self.users().update(id.into_inner(), |data| {
            data.insert(PASSWORD_HASH.into(), Value::String(password_hash.to_string()));
        })?;
        info!(user_id = %id, "Password updated");
        UserRecord::from_document(&doc)
    }

    /// Changes a user's display name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist.
    pub fn update_display_name(&self, id: UserId, display_name: &str) -> Result<UserRecord, StoreError> {
        let doc = self.users().update(id.into_inner(), |data| {
            data.insert(DISPLAY_NAME.into(), Value::String(display_name.to_string()));
        })?;
        UserRecord::from_document(&doc)
    }
}
