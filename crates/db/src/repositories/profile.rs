//! Profile (user settings) repository.

use std::sync::Arc;

use serde_json::{Map, Value};
use spendwise_core::ingest::fields;
use spendwise_core::profile::{SettingsUpdate, UserSettings};
use spendwise_shared::types::UserId;
use tracing::{info, warn};

use super::{collections, owned_by, owner_value};
use crate::error::StoreError;
use crate::store::{Collection, Document, DocumentStore};

const SETTINGS: &str = "settings";

/// Profile repository.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    store: Arc<DocumentStore>,
}

impl ProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub const fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn profiles(&self) -> Arc<Collection> {
        self.store.collection(collections::PROFILES)
    }

    /// Reads stored settings. Unreadable settings fall back to defaults.
    fn settings_of(doc: &Document) -> UserSettings {
        let Some(raw) = doc.get(SETTINGS) else {
            return UserSettings::default();
        };
        serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
            warn!(profile_id = %doc.id, error = %e, "Unreadable settings, using defaults");
            UserSettings::default()
        })
    }

    fn find_or_insert(&self, user_id: UserId) -> Result<Document, StoreError> {
        let profiles = self.profiles();
        if let Some(doc) = profiles.find_one(&owned_by(user_id)) {
            return Ok(doc);
        }

        let mut data = Map::new();
        data.insert(fields::USER_ID.into(), owner_value(user_id));
        data.insert(SETTINGS.into(), serde_json::to_value(UserSettings::default())?);
        let doc = profiles.insert(data);
        info!(user_id = %user_id, "Profile created");
        Ok(doc)
    }

    /// Returns a user's settings, creating the profile with defaults if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the default settings cannot be encoded.
    pub fn get_or_create(&self, user_id: UserId) -> Result<UserSettings, StoreError> {
        self.find_or_insert(user_id).map(|doc| Self::settings_of(&doc))
    }

    /// Applies a partial settings update and returns the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile vanished mid-update.
    pub fn update_settings(
        &self,
        user_id: UserId,
        update: &SettingsUpdate,
    ) -> Result<UserSettings, StoreError> {
        let doc = self.find_or_insert(user_id)?;
        let settings = Self::settings_of(&doc).merged(update);
        let encoded: Value = serde_json::to_value(&settings)?;

        self.profiles().update(doc.id, |data| {
            data.insert(SETTINGS.into(), encoded);
        })?;
        info!(user_id = %user_id, "Settings updated");
        Ok(settings)
    }
}
