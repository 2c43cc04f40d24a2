//! Expense repository.
//!
//! Reads go through `spendwise_core::ingest`, so listings never fail on a
//! malformed record: bad records are logged and skipped.

use std::sync::Arc;

use spendwise_core::expense::{Expense, ExpenseFilter, NewExpense};
use spendwise_core::ingest::{self, fields};
use spendwise_shared::types::{ExpenseId, UserId};
use tracing::info;

use super::{collections, is_owned_by, owned_by};
use crate::error::StoreError;
use crate::store::{Collection, Document, DocumentStore};

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    store: Arc<DocumentStore>,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn expenses(&self) -> Arc<Collection> {
        self.store.collection(collections::EXPENSES)
    }

    fn read(doc: &Document, user_id: UserId) -> Option<Expense> {
        ingest::normalize_expense(&doc.meta(), user_id, &doc.data)
    }

    fn written(doc: &Document, user_id: UserId) -> Result<Expense, StoreError> {
        Self::read(doc, user_id).ok_or_else(|| StoreError::Corrupt {
            id: doc.id,
            reason: "expense could not be read back".to_string(),
        })
    }

    fn owned_document(&self, user_id: UserId, id: ExpenseId) -> Option<Document> {
        self.expenses()
            .get(id.into_inner())
            .filter(|doc| is_owned_by(doc, user_id))
    }

    /// Stores a validated expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be read back.
    pub fn create(&self, user_id: UserId, expense: &NewExpense) -> Result<Expense, StoreError> {
        let doc = self
            .expenses()
            .insert(ingest::expense_document(user_id, expense));
        info!(user_id = %user_id, expense_id = %doc.id, "Expense created");
        Self::written(&doc, user_id)
    }

    /// Finds one of the user's expenses. Other users' records are invisible.
    #[must_use]
    pub fn find_by_id(&self, user_id: UserId, id: ExpenseId) -> Option<Expense> {
        self.owned_document(user_id, id)
            .and_then(|doc| Self::read(&doc, user_id))
    }

    /// Replaces every field of one of the user's expenses.
    ///
    /// Returns `None` if the user has no such expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the record vanished mid-update.
    pub fn update(
        &self,
        user_id: UserId,
        id: ExpenseId,
        expense: &NewExpense,
    ) -> Result<Option<Expense>, StoreError> {
        if self.owned_document(user_id, id).is_none() {
            return Ok(None);
        }
        let doc = self
            .expenses()
            .replace(id.into_inner(), ingest::expense_document(user_id, expense))?;
        info!(user_id = %user_id, expense_id = %id, "Expense updated");
        Self::written(&doc, user_id).map(Some)
    }

    /// Deletes one of the user's expenses. Returns false if there was none.
    ///
    /// # Errors
    ///
    /// Returns an error if the record vanished mid-delete.
    pub fn delete(&self, user_id: UserId, id: ExpenseId) -> Result<bool, StoreError> {
        if self.owned_document(user_id, id).is_none() {
            return Ok(false);
        }
        self.expenses().delete(id.into_inner())?;
        info!(user_id = %user_id, expense_id = %id, "Expense deleted");
        Ok(true)
    }

    /// Lists the user's expenses through `filter`.
    #[must_use]
    pub fn list(&self, user_id: UserId, filter: &ExpenseFilter) -> Vec<Expense> {
        let mut query = owned_by(user_id);
        if let Some(category) = &filter.category {
            query = query.filter_eq(fields::CATEGORY, category.as_str());
        }
        let expenses = self
            .expenses()
            .query(&query)
            .iter()
            .filter_map(|doc| Self::read(doc, user_id))
            .collect();
        filter.apply(expenses)
    }

    /// Every readable expense of the user, in storage order.
    #[must_use]
    pub fn list_all(&self, user_id: UserId) -> Vec<Expense> {
        self.expenses()
            .query(&owned_by(user_id))
            .iter()
            .filter_map(|doc| Self::read(doc, user_id))
            .collect()
    }
}
