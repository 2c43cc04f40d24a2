//! Filtering, searching and sorting of expense listings.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::Expense;

/// Maximum number of results returned by [`quick_search`].
pub const QUICK_SEARCH_LIMIT: usize = 10;

/// Field an expense listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Occurrence date.
    #[default]
    Date,
    /// Amount.
    Amount,
    /// Name (case-insensitive; unnamed expenses sort as empty).
    Name,
    /// Category.
    Category,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Options for listing expenses.
///
/// Every field is optional; the default lists everything newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Earliest date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive.
    pub to: Option<NaiveDate>,
    /// Case-insensitive free-text search.
    pub search: Option<String>,
    /// Sort field.
    pub sort: SortField,
    /// Sort direction.
    pub direction: SortDirection,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    /// Returns true if `expense` passes the category, date and search filters.
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        if self
            .category
            .as_deref()
            .is_some_and(|c| c != expense.category)
        {
            return false;
        }
        if self.from.is_some_and(|from| expense.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| expense.date > to) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => matches_search(expense, term),
            _ => true,
        }
    }

    /// Filters, sorts and truncates a listing.
    #[must_use]
    pub fn apply(&self, expenses: Vec<Expense>) -> Vec<Expense> {
        let mut result: Vec<Expense> = expenses.into_iter().filter(|e| self.matches(e)).collect();
        sort_expenses(&mut result, self.sort, self.direction);
        if let Some(limit) = self.limit {
            result.truncate(limit);
        }
        result
    }
}

/// Case-insensitive substring match over name, description, category and amount.
#[must_use]
pub fn matches_search(expense: &Expense, term: &str) -> bool {
    let needle = term.to_lowercase();
    let contains = |text: &str| text.to_lowercase().contains(&needle);

    expense.name.as_deref().is_some_and(contains)
        || expense.description.as_deref().is_some_and(contains)
        || contains(&expense.category)
        || expense.amount.normalize().to_string().contains(&needle)
}

/// Returns up to [`QUICK_SEARCH_LIMIT`] matches, newest first.
#[must_use]
pub fn quick_search(expenses: Vec<Expense>, term: &str) -> Vec<Expense> {
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }
    ExpenseFilter {
        search: Some(term.to_string()),
        limit: Some(QUICK_SEARCH_LIMIT),
        ..ExpenseFilter::default()
    }
    .apply(expenses)
}

/// Sorts expenses in place. The sort is stable.
pub fn sort_expenses(expenses: &mut [Expense], field: SortField, direction: SortDirection) {
    expenses.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &Expense, b: &Expense, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Amount => a.amount.cmp(&b.amount),
        SortField::Name => sort_name(a).cmp(&sort_name(b)),
        SortField::Category => a.category.cmp(&b.category),
    }
}

fn sort_name(expense: &Expense) -> String {
    expense.name.as_deref().unwrap_or_default().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use spendwise_shared::types::{ExpenseId, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(name: Option<&str>, amount: Decimal, category: &str, on: NaiveDate) -> Expense {
        Expense {
            id: ExpenseId::new(),
            user_id: UserId::new(),
            amount,
            category: category.to_string(),
            date: on,
            name: name.map(str::to_string),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(Some("Groceries"), dec!(45.20), "Food", date(2024, 1, 5)),
            expense(Some("bus pass"), dec!(30), "Transportation", date(2024, 1, 20)),
            expense(None, dec!(1200), "Housing", date(2024, 1, 1)),
            expense(Some("Cinema"), dec!(15.5), "Entertainment", date(2024, 2, 3)),
        ]
    }

    fn names(expenses: &[Expense]) -> Vec<Option<&str>> {
        expenses.iter().map(|e| e.name.as_deref()).collect()
    }

    #[test]
    fn test_default_is_date_desc() {
        let result = ExpenseFilter::default().apply(sample());
        assert_eq!(
            names(&result),
            vec![Some("Cinema"), Some("bus pass"), Some("Groceries"), None]
        );
    }

    #[test]
    fn test_category_filter_is_exact() {
        let filter = ExpenseFilter {
            category: Some("food".to_string()),
            ..ExpenseFilter::default()
        };
        assert!(filter.apply(sample()).is_empty());

        let filter = ExpenseFilter {
            category: Some("Food".to_string()),
            ..ExpenseFilter::default()
        };
        assert_eq!(filter.apply(sample()).len(), 1);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = ExpenseFilter {
            from: Some(date(2024, 1, 5)),
            to: Some(date(2024, 1, 20)),
            ..ExpenseFilter::default()
        };
        assert_eq!(
            names(&filter.apply(sample())),
            vec![Some("bus pass"), Some("Groceries")]
        );
    }

    #[test]
    fn test_search_covers_text_and_amount() {
        let data = sample();
        assert!(matches_search(&data[0], "GROC"));
        assert!(matches_search(&data[1], "transport"));
        assert!(matches_search(&data[2], "1200"));
        assert!(matches_search(&data[3], "15.5"));
        assert!(!matches_search(&data[3], "food"));
    }

    #[test]
    fn test_search_matches_description() {
        let mut item = sample().remove(0);
        item.description = Some("Weekly shop at the market".to_string());
        assert!(matches_search(&item, "market"));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = ExpenseFilter {
            search: Some("   ".to_string()),
            ..ExpenseFilter::default()
        };
        assert_eq!(filter.apply(sample()).len(), 4);
    }

    #[test]
    fn test_sort_by_amount_asc() {
        let filter = ExpenseFilter {
            sort: SortField::Amount,
            direction: SortDirection::Asc,
            ..ExpenseFilter::default()
        };
        let amounts: Vec<Decimal> = filter.apply(sample()).iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![dec!(15.5), dec!(30), dec!(45.20), dec!(1200)]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let filter = ExpenseFilter {
            sort: SortField::Name,
            direction: SortDirection::Asc,
            ..ExpenseFilter::default()
        };
        assert_eq!(
            names(&filter.apply(sample())),
            vec![None, Some("bus pass"), Some("Cinema"), Some("Groceries")]
        );
    }

    #[test]
    fn test_limit() {
        let filter = ExpenseFilter {
            limit: Some(2),
            ..ExpenseFilter::default()
        };
        assert_eq!(filter.apply(sample()).len(), 2);
    }

    #[test]
    fn test_quick_search_caps_results() {
        let many: Vec<Expense> = (1..=15)
            .map(|d| expense(Some("Coffee"), dec!(3), "Food", date(2024, 3, d)))
            .collect();

        let result = quick_search(many, "coffee");
        assert_eq!(result.len(), QUICK_SEARCH_LIMIT);
        assert_eq!(result[0].date, date(2024, 3, 15));
    }

    #[test]
    fn test_quick_search_empty_term() {
        assert!(quick_search(sample(), "  ").is_empty());
    }

    #[test]
    fn test_filter_deserializes_from_query_shape() {
        let filter: ExpenseFilter = serde_json::from_str(
            r#"{"category": "Food", "from": "2024-01-01", "sort": "amount", "direction": "asc"}"#,
        )
        .unwrap();
        assert_eq!(filter.category.as_deref(), Some("Food"));
        assert_eq!(filter.from, Some(date(2024, 1, 1)));
        assert_eq!(filter.sort, SortField::Amount);
        assert_eq!(filter.direction, SortDirection::Asc);
        assert!(filter.limit.is_none());
    }
}
