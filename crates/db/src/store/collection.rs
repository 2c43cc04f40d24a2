//! A named set of documents.

use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::document::Document;
use super::query::Query;
use crate::error::StoreError;

/// A concurrent collection of documents keyed by ID.
///
/// Each write touches one document and is atomic. There are no
/// multi-document transactions.
#[derive(Debug)]
pub struct Collection {
    name: String,
    docs: DashMap<Uuid, Document>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            docs: DashMap::new(),
        }
    }

    /// Collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true if the collection holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Inserts a document, assigning its ID and timestamps.
    pub fn insert(&self, data: Map<String, Value>) -> Document {
        let now = Utc::now();
        let doc = Document {
            id: Uuid::now_v7(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.docs.insert(doc.id, doc.clone());
        doc
    }

    /// Returns a copy of a document.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Document> {
        self.docs.get(&id).map(|entry| entry.value().clone())
    }

    /// Replaces every field of a document, keeping its creation time.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    pub fn replace(&self, id: Uuid, data: Map<String, Value>) -> Result<Document, StoreError> {
        self.update(id, |fields| *fields = data)
    }

    /// Modifies a document in place and bumps its update time.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    pub fn update<F>(&self, id: Uuid, apply: F) -> Result<Document, StoreError>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let mut entry = self.docs.get_mut(&id).ok_or_else(|| self.not_found(id))?;
        apply(&mut entry.data);
        entry.updated_at = Utc::now();
        Ok(entry.value().clone())
    }

    /// Modifies every document matching `query`'s filters. Returns how many changed.
    pub fn update_where<F>(&self, query: &Query, apply: F) -> usize
    where
        F: Fn(&mut Map<String, Value>),
    {
        let now = Utc::now();
        let mut changed = 0;
        for mut entry in self.docs.iter_mut() {
            if query.matches(entry.value()) {
                apply(&mut entry.data);
                entry.updated_at = now;
                changed += 1;
            }
        }
        changed
    }

    /// Removes every document matching `query`'s filters. Returns how many were removed.
    pub fn delete_where(&self, query: &Query) -> usize {
        let mut removed = 0;
        self.docs.retain(|_, doc| {
            let keep = !query.matches(doc);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Removes a document and returns it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    pub fn delete(&self, id: Uuid) -> Result<Document, StoreError> {
        self.docs
            .remove(&id)
            .map(|(_, doc)| doc)
            .ok_or_else(|| self.not_found(id))
    }

    /// Returns copies of all documents matching `query`.
    #[must_use]
    pub fn query(&self, query: &Query) -> Vec<Document> {
        let matched = self
            .docs
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        query.finish(matched)
    }

    /// Returns the first document matching `query`.
    #[must_use]
    pub fn find_one(&self, query: &Query) -> Option<Document> {
        self.query(query).into_iter().next()
    }

    /// All documents in ID order.
    pub(crate) fn documents(&self) -> Vec<Document> {
        self.query(&Query::new())
    }

    /// Puts back a previously stored document unchanged.
    pub(crate) fn restore(&self, doc: Document) {
        self.docs.insert(doc.id, doc);
    }

    fn not_found(&self, id: Uuid) -> StoreError {
        StoreError::NotFound {
            collection: self.name.clone(),
            id,
        }
    }
}
