//! Document queries.
//!
//! Comparisons are typed: strings compare lexicographically (dates are
//! stored as `YYYY-MM-DD` so this orders them), numbers compare as
//! decimals, and values of different kinds never satisfy a filter.

use std::cmp::Ordering;

use serde_json::Value;
use spendwise_core::ingest::number_to_decimal;

use super::document::Document;

/// Sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// A condition on one field. Documents missing the field never match.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals value.
    Eq(String, Value),
    /// Field is greater than or equal to value.
    Gte(String, Value),
    /// Field is less than or equal to value.
    Lte(String, Value),
}

impl Filter {
    /// Returns true if `doc` satisfies the condition.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Eq(field, expected) => doc
                .get(field)
                .is_some_and(|v| compare_values(v, expected) == Some(Ordering::Equal)),
            Self::Gte(field, bound) => doc.get(field).is_some_and(|v| {
                matches!(
                    compare_values(v, bound),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            }),
            Self::Lte(field, bound) => doc.get(field).is_some_and(|v| {
                matches!(
                    compare_values(v, bound),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }),
        }
    }
}

/// Filters, ordering and limit applied to a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// All filters must match.
    pub filters: Vec<Filter>,
    /// Ordering field and direction. Ties and unordered results follow insertion order.
    pub order_by: Option<(String, SortOrder)>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl Query {
    /// An empty query matching every document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn filter_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field.to_string(), value.into()));
        self
    }

    /// Adds a lower bound.
    #[must_use]
    pub fn filter_gte(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte(field.to_string(), value.into()));
        self
    }

    /// Adds an upper bound.
    #[must_use]
    pub fn filter_lte(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lte(field.to_string(), value.into()));
        self
    }

    /// Orders results by `field`.
    #[must_use]
    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by = Some((field.to_string(), order));
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if `doc` satisfies every filter.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }

    /// Sorts and truncates matched documents.
    pub(crate) fn finish(&self, mut docs: Vec<Document>) -> Vec<Document> {
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some((field, order)) = &self.order_by {
            docs.sort_by(|a, b| {
                let ordering = sort_key_cmp(a.get(field), b.get(field));
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        docs
    }
}

/// Compares two values of the same kind. `None` for mismatched kinds.
#[must_use]
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => Some(number_to_decimal(x)?.cmp(&number_to_decimal(y)?)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order used for sorting: values group by kind, then compare within the kind.
fn sort_key_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    kind_rank(a).cmp(&kind_rank(b)).then_with(|| match (a, b) {
        (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    })
}
