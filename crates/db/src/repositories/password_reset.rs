//! Password reset token repository.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use spendwise_core::ingest::fields;
use spendwise_shared::types::UserId;
use tracing::{debug, info};

use super::{collections, hash_token, owned_by, owner_value, read_owner, timestamp_value};
use crate::error::StoreError;
use crate::store::{Collection, DocumentStore, Query};

/// How long a reset token stays valid.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

const TOKEN_HASH: &str = "token_hash";
const EXPIRES_AT: &str = "expires_at";
const USED: &str = "used";

/// Password reset repository.
#[derive(Debug, Clone)]
pub struct PasswordResetRepository {
    store: Arc<DocumentStore>,
}

impl PasswordResetRepository {
    /// Creates a new password reset repository.
    #[must_use]
    pub const fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn resets(&self) -> Arc<Collection> {
        self.store.collection(collections::PASSWORD_RESETS)
    }

    /// Generates a random URL-safe token.
    #[must_use]
    pub fn generate_token() -> String {
        let bytes: [u8; 32] = rand::random();
        base64_url::encode(&bytes)
    }

    /// Creates a reset token for a user, invalidating earlier ones.
    /// Returns the raw token; only its hash is stored.
    pub fn create_token(&self, user_id: UserId) -> String {
        self.invalidate_user_tokens(user_id);
        self.purge_spent();

        let raw_token = Self::generate_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        let mut data = Map::new();
        data.insert(fields::USER_ID.into(), owner_value(user_id));
        data.insert(TOKEN_HASH.into(), Value::String(hash_token(&raw_token)));
        data.insert(EXPIRES_AT.into(), timestamp_value(expires_at));
        data.insert(USED.into(), Value::Bool(false));
        self.resets().insert(data);

        info!(user_id = %user_id, "Password reset token issued");
        raw_token
    }

    /// Marks a token used and returns its user.
    ///
    /// Returns `None` if the token is unknown, expired, or already used.
    /// Two concurrent calls with the same token cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record is corrupt.
    pub fn consume_token(&self, raw_token: &str) -> Result<Option<UserId>, StoreError> {
        let resets = self.resets();
        let query = Query::new()
            .filter_eq(TOKEN_HASH, hash_token(raw_token))
            .filter_eq(USED, false)
            .filter_gte(EXPIRES_AT, timestamp_value(Utc::now()));
        let Some(doc) = resets.find_one(&query) else {
            debug!("Reset token rejected");
            return Ok(None);
        };

        let mut claimed = false;
        resets.update(doc.id, |data| {
            if data.get(USED) != Some(&Value::Bool(true)) {
                data.insert(USED.into(), Value::Bool(true));
                claimed = true;
            }
        })?;
        if !claimed {
            return Ok(None);
        }
        read_owner(&doc).map(Some)
    }

    /// Marks every unused token of a user as used. Returns how many changed.
    pub fn invalidate_user_tokens(&self, user_id: UserId) -> usize {
        let query = owned_by(user_id).filter_eq(USED, false);
        self.resets().update_where(&query, |data| {
            data.insert(USED.into(), Value::Bool(true));
        })
    }

    /// Deletes used and expired tokens. Returns how many were removed.
    pub fn purge_spent(&self) -> usize {
        let resets = self.resets();
        let purged = resets.delete_where(&Query::new().filter_eq(USED, true))
            + resets.delete_where(&Query::new().filter_lte(EXPIRES_AT, timestamp_value(Utc::now())));
        if purged > 0 {
            debug!(purged, "Purged spent reset tokens");
        }
        purged
    }
}
