//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the document store and repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document does not exist.
    #[error("Document {id} not found in {collection}")]
    NotFound {
        /// Collection name.
        collection: String,
        /// Document ID.
        id: Uuid,
    },

    /// A uniqueness rule would be violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored document could not be decoded.
    #[error("Corrupt document {id}: {reason}")]
    Corrupt {
        /// Document ID.
        id: Uuid,
        /// What was wrong with it.
        reason: String,
    },

    /// Reading or writing a snapshot failed.
    #[error("Snapshot I/O error at {path}: {source}")]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Encoding or decoding JSON failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
