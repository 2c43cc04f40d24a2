//! In-memory document store.
//!
//! Documents are grouped into named collections that are created on first
//! use. The whole store can be written to and read from a JSON snapshot.

mod collection;
mod document;
mod query;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use collection::Collection;
pub use document::Document;
pub use query::{Filter, Query, SortOrder, compare_values};

use crate::error::StoreError;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    collections: BTreeMap<String, Vec<Document>>,
}

/// A set of named collections.
#[derive(Debug, Default)]
pub struct DocumentStore {
    collections: DashMap<String, Arc<Collection>>,
}

impl DocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a collection, creating it if needed.
    #[must_use]
    pub fn collection(&self, name: &str) -> Arc<Collection> {
        if let Some(existing) = self.collections.get(name) {
            return Arc::clone(existing.value());
        }
        let entry = self
            .collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Collection::new(name)));
        Arc::clone(entry.value())
    }

    /// Total number of documents across collections.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.collections.iter().map(|c| c.value().len()).sum()
    }

    /// Writes every collection to `path` as JSON. Returns the number of documents written.
    ///
    /// The file is written next to `path` first and then renamed over it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save_snapshot(&self, path: &Path) -> Result<usize, StoreError> {
        let collections: BTreeMap<String, Vec<Document>> = self
            .collections
            .iter()
            .map(|c| (c.key().clone(), c.value().documents()))
            .collect();
        let count = collections.values().map(Vec::len).sum();
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            collections,
        };

        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), documents = count, "Snapshot saved");
        Ok(count)
    }

    /// Reads a store from a snapshot written by [`Self::save_snapshot`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        let bytes = std::fs::read(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;

        let store = Self::new();
        for (name, docs) in snapshot.collections {
            let collection = store.collection(&name);
            for doc in docs {
                collection.restore(doc);
            }
        }

        info!(
            path = %path.display(),
            version = snapshot.version,
            documents = store.document_count(),
            "Snapshot loaded"
        );
        Ok(store)
    }

    /// Loads `path` if it exists, otherwise starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing snapshot cannot be read.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            Self::load_snapshot(path)
        } else {
            info!(path = %path.display(), "No snapshot found, starting empty");
            Ok(Self::new())
        }
    }
}
