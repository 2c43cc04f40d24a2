//! Refresh-token session repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use spendwise_core::ingest::fields;
use spendwise_shared::types::{SessionId, UserId};
use tracing::{debug, info};

use super::{collections, hash_token, owned_by, owner_value, read_owner, read_timestamp, timestamp_value};
use crate::error::StoreError;
use crate::store::{Collection, Document, DocumentStore, Query};

const TOKEN_HASH: &str = "token_hash";
const EXPIRES_AT: &str = "expires_at";
const REVOKED: &str = "revoked";

/// A stored refresh-token session. The token itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Session ID.
    pub id: SessionId,
    /// Owning user.
    pub user_id: UserId,
    /// When the refresh token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// Revoked by logout or a password reset.
    pub revoked: bool,
    /// Sign-in time.
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    fn from_document(doc: &Document) -> Result<Self, StoreError> {
        Ok(Self {
            id: SessionId::from_uuid(doc.id),
            user_id: read_owner(doc)?,
            expires_at: read_timestamp(doc, EXPIRES_AT)?,
            revoked: doc.get_flag(REVOKED),
            created_at: doc.created_at,
        })
    }
}

/// Session repository.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    store: Arc<DocumentStore>,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn sessions(&self) -> Arc<Collection> {
        self.store.collection(collections::SESSIONS)
    }

    fn live(refresh_token: &str) -> Query {
        Query::new()
            .filter_eq(TOKEN_HASH, hash_token(refresh_token))
            .filter_eq(REVOKED, false)
            .filter_gte(EXPIRES_AT, timestamp_value(Utc::now()))
    }

    /// Records a new session for a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be read back.
    pub fn create(
        &self,
        user_id: UserId,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionRecord, StoreError> {
        self.purge_inactive();

        let mut data = Map::new();
        data.insert(fields::USER_ID.into(), owner_value(user_id));
        data.insert(TOKEN_HASH.into(), Value::String(hash_token(refresh_token)));
        data.insert(EXPIRES_AT.into(), timestamp_value(expires_at));
        data.insert(REVOKED.into(), Value::Bool(false));

        let doc = self.sessions().insert(data);
        SessionRecord::from_document(&doc)
    }

    /// Finds the unrevoked, unexpired session for a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record is corrupt.
    pub fn find_active_by_token(&self, refresh_token: &str) -> Result<Option<SessionRecord>, StoreError> {
        self.sessions()
            .find_one(&Self::live(refresh_token))
            .map(|doc| SessionRecord::from_document(&doc))
            .transpose()
    }

    /// Revokes the session for a refresh token. Returns false if none was live.
    ///
    /// # Errors
    ///
    /// Returns an error if the session vanished mid-update.
    pub fn revoke_by_token(&self, refresh_token: &str) -> Result<bool, StoreError> {
        let sessions = self.sessions();
        let Some(doc) = sessions.find_one(&Self::live(refresh_token)) else {
            return Ok(false);
        };
        sessions.update(doc.id, |data| {
            data.insert(REVOKED.into(), Value::Bool(true));
        })?;
        Ok(true)
    }

    /// Revokes every session of a user. Returns how many were revoked.
    pub fn revoke_all_for_user(&self, user_id: UserId) -> usize {
        let query = owned_by(user_id).filter_eq(REVOKED, false);
        let revoked = self.sessions().update_where(&query, |data| {
            data.insert(REVOKED.into(), Value::Bool(true));
        });
        info!(user_id = %user_id, revoked, "Sessions revoked");
        revoked
    }

    /// Deletes revoked and expired sessions. Returns how many were removed.
    pub fn purge_inactive(&self) -> usize {
        let sessions = self.sessions();
        let purged = sessions.delete_where(&Query::new().filter_eq(REVOKED, true))
            + sessions.delete_where(&Query::new().filter_lte(EXPIRES_AT, timestamp_value(Utc::now())));
        if purged > 0 {
            debug!(purged, "Purged inactive sessions");
        }
        purged
    }
}
