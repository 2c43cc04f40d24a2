//! Budget repository.

use std::sync::Arc;

use spendwise_core::budget::{Budget, NewBudget};
use spendwise_core::ingest::{self, fields};
use spendwise_shared::types::{BudgetId, UserId};
use tracing::info;

use super::{collections, is_owned_by, owned_by};
use crate::error::StoreError;
use crate::store::{Collection, Document, DocumentStore, SortOrder};

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    store: Arc<DocumentStore>,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn budgets(&self) -> Arc<Collection> {
        self.store.collection(collections::BUDGETS)
    }

    fn read(doc: &Document, user_id: UserId) -> Option<Budget> {
        ingest::normalize_budget(&doc.meta(), user_id, &doc.data)
    }

    fn written(doc: &Document, user_id: UserId) -> Result<Budget, StoreError> {
        Self::read(doc, user_id).ok_or_else(|| StoreError::Corrupt {
            id: doc.id,
            reason: "budget could not be read back".to_string(),
        })
    }

    fn owned_document(&self, user_id: UserId, id: BudgetId) -> Option<Document> {
        self.budgets()
            .get(id.into_inner())
            .filter(|doc| is_owned_by(doc, user_id))
    }

    /// Stores a validated budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be read back.
    pub fn create(&self, user_id: UserId, budget: &NewBudget) -> Result<Budget, StoreError> {
        let doc = self.budgets().insert(ingest::budget_document(user_id, budget));
        info!(user_id = %user_id, budget_id = %doc.id, category = %budget.category, "Budget created");
        Self::written(&doc, user_id)
    }

    /// Finds one of the user's budgets.
    #[must_use]
    pub fn find_by_id(&self, user_id: UserId, id: BudgetId) -> Option<Budget> {
        self.owned_document(user_id, id)
            .and_then(|doc| Self::read(&doc, user_id))
    }

    /// Replaces every field of one of the user's budgets.
    ///
    /// # Errors
    ///
    /// Returns an error if the record vanished mid-update.
    pub fn update(
        &self,
        user_id: UserId,
        id: BudgetId,
        budget: &NewBudget,
    ) -> Result<Option<Budget>, StoreError> {
        if self.owned_document(user_id, id).is_none() {
            return Ok(None);
        }
        let doc = self
            .budgets()
            .replace(id.into_inner(), ingest::budget_document(user_id, budget))?;
        info!(user_id = %user_id, budget_id = %id, "Budget updated");
        Self::written(&doc, user_id).map(Some)
    }

    /// Deletes one of the user's budgets. Returns false if there was none.
    ///
    /// # Errors
    ///
    /// Returns an error if the record vanished mid-delete.
    pub fn delete(&self, user_id: UserId, id: BudgetId) -> Result<bool, StoreError> {
        if self.owned_document(user_id, id).is_none() {
            return Ok(false);
        }
        self.budgets().delete(id.into_inner())?;
        info!(user_id = %user_id, budget_id = %id, "Budget deleted");
        Ok(true)
    }

    /// The user's readable budgets, latest start date first.
    #[must_use]
    pub fn list(&self, user_id: UserId) -> Vec<Budget> {
        let query = owned_by(user_id).order_by(fields::START_DATE, SortOrder::Desc);
        self.budgets()
            .query(&query)
            .iter()
            .filter_map(|doc| Self::read(doc, user_id))
            .collect()
    }
}
