//! Stored documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use spendwise_core::ingest::RecordMeta;
use uuid::Uuid;

/// A JSON document with server-assigned metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document ID, assigned on insert.
    pub id: Uuid,
    /// Document fields.
    pub data: Map<String, Value>,
    /// Set once on insert.
    pub created_at: DateTime<Utc>,
    /// Bumped on every write.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Returns a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Returns a string field.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Returns a boolean field, `false` when absent.
    #[must_use]
    pub fn get_flag(&self, field: &str) -> bool {
        self.data
            .get(field)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Storage metadata for the ingestion layer.
    #[must_use]
    pub const fn meta(&self) -> RecordMeta {
        RecordMeta {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
