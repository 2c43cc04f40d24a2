//! Normalization of raw stored documents into domain types.
//!
//! Stored documents are loosely typed JSON. Reading them goes through this
//! module, which coerces what can be coerced and drops what cannot:
//!
//! - an expense amount that is not a non-negative decimal (a JSON number or
//!   a decimal string) becomes 0
//! - a missing expense category becomes the empty string, which never
//!   matches a budget
//! - an expense whose date cannot be parsed is dropped
//! - a budget that violates its own invariants is dropped
//!
//! Every coercion is logged. The write side lives here too so that field
//! names are defined in one place.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use spendwise_shared::types::{BudgetId, ExpenseId, UserId};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::budget::{Budget, BudgetPeriod, NewBudget};
use crate::expense::{Expense, NewExpense};

/// Document field names.
pub mod fields {
    /// Owning user ID.
    pub const USER_ID: &str = "user_id";
    /// Monetary amount.
    pub const AMOUNT: &str = "amount";
    /// Category name.
    pub const CATEGORY: &str = "category";
    /// Expense date.
    pub const DATE: &str = "date";
    /// Expense name.
    pub const NAME: &str = "name";
    /// Expense description.
    pub const DESCRIPTION: &str = "description";
    /// Budget period.
    pub const PERIOD: &str = "period";
    /// Budget start date.
    pub const START_DATE: &str = "start_date";
    /// Budget end date.
    pub const END_DATE: &str = "end_date";
    /// Budget notes.
    pub const NOTES: &str = "notes";
}

/// Storage metadata that accompanies a raw document.
#[derive(Debug, Clone, Copy)]
pub struct RecordMeta {
    /// Document ID.
    pub id: Uuid,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
    /// Server-assigned update time.
    pub updated_at: DateTime<Utc>,
}

/// Reads an expense document.
///
/// Returns `None` when the record has no usable date.
#[must_use]
pub fn normalize_expense(meta: &RecordMeta, owner: UserId, doc: &Map<String, Value>) -> Option<Expense> {
    let Some(date) = doc.get(fields::DATE).and_then(parse_date) else {
        warn!(expense_id = %meta.id, "Dropping expense with unparseable date");
        return None;
    };

    let amount = match doc.get(fields::AMOUNT) {
        Some(value) => match value_to_decimal(value) {
            Some(amount) if amount >= Decimal::ZERO => amount,
            Some(_) => {
                warn!(expense_id = %meta.id, amount = %value, "Negative expense amount, counting as 0");
                Decimal::ZERO
            }
            None => {
                warn!(expense_id = %meta.id, amount = %value, "Non-numeric expense amount, counting as 0");
                Decimal::ZERO
            }
        },
        None => {
            debug!(expense_id = %meta.id, "Missing expense amount, counting as 0");
            Decimal::ZERO
        }
    };

    let category = match doc.get(fields::CATEGORY) {
        Some(Value::String(c)) => c.clone(),
        _ => {
            debug!(expense_id = %meta.id, "Expense without category");
            String::new()
        }
    };

    Some(Expense {
        id: ExpenseId::from_uuid(meta.id),
        user_id: owner,
        amount,
        category,
        date,
        name: optional_string(doc, fields::NAME),
        description: optional_string(doc, fields::DESCRIPTION),
        created_at: meta.created_at,
        updated_at: meta.updated_at,
    })
}

/// Reads a budget document.
///
/// Returns `None` when the record violates a budget invariant.
#[must_use]
pub fn normalize_budget(meta: &RecordMeta, owner: UserId, doc: &Map<String, Value>) -> Option<Budget> {
    let amount = doc
        .get(fields::AMOUNT)
        .and_then(value_to_decimal)
        .filter(|a| *a > Decimal::ZERO);
    let Some(amount) = amount else {
        warn!(budget_id = %meta.id, "Dropping budget without a positive amount");
        return None;
    };

    let Some(category) = doc.get(fields::CATEGORY).and_then(Value::as_str) else {
        warn!(budget_id = %meta.id, "Dropping budget without category");
        return None;
    };

    let Some(period) = doc
        .get(fields::PERIOD)
        .and_then(Value::as_str)
        .and_then(|p| BudgetPeriod::from_str(p).ok())
    else {
        warn!(budget_id = %meta.id, "Dropping budget with unknown period");
        return None;
    };

    let Some(start_date) = doc.get(fields::START_DATE).and_then(parse_date) else {
        warn!(budget_id = %meta.id, "Dropping budget with unparseable start date");
        return None;
    };

    let end_date = match doc.get(fields::END_DATE) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let Some(end) = parse_date(value) else {
                warn!(budget_id = %meta.id, "Dropping budget with unparseable end date");
                return None;
            };
            if end < start_date {
                warn!(budget_id = %meta.id, "Dropping budget that ends before it starts");
                return None;
            }
            Some(end)
        }
    };

    Some(Budget {
        id: BudgetId::from_uuid(meta.id),
        user_id: owner,
        category: category.to_string(),
        amount,
        period,
        start_date,
        end_date,
        notes: optional_string(doc, fields::NOTES),
        created_at: meta.created_at,
        updated_at: meta.updated_at,
    })
}

/// Builds the stored fields of an expense.
#[must_use]
pub fn expense_document(owner: UserId, expense: &NewExpense) -> Map<String, Value> {
    let mut doc = Map::new();
    doc.insert(fields::USER_ID.into(), Value::String(owner.to_string()));
    doc.insert(fields::AMOUNT.into(), decimal_to_value(expense.amount));
    doc.insert(fields::CATEGORY.into(), Value::String(expense.category.clone()));
    doc.insert(fields::DATE.into(), date_to_value(expense.date));
    doc.insert(fields::NAME.into(), option_to_value(expense.name.as_deref()));
    doc.insert(
        fields::DESCRIPTION.into(),
        option_to_value(expense.description.as_deref()),
    );
    doc
}

/// Builds the stored fields of a budget.
#[must_use]
pub fn budget_document(owner: UserId, budget: &NewBudget) -> Map<String, Value> {
    let mut doc = Map::new();
    doc.insert(fields::USER_ID.into(), Value::String(owner.to_string()));
    doc.insert(fields::CATEGORY.into(), Value::String(budget.category.clone()));
    doc.insert(fields::AMOUNT.into(), decimal_to_value(budget.amount));
    doc.insert(fields::PERIOD.into(), Value::String(budget.period.as_str().into()));
    doc.insert(fields::START_DATE.into(), date_to_value(budget.start_date));
    doc.insert(
        fields::END_DATE.into(),
        budget.end_date.map_or(Value::Null, date_to_value),
    );
    doc.insert(fields::NOTES.into(), option_to_value(budget.notes.as_deref()));
    doc
}

/// Formats a date the way documents store it.
#[must_use]
pub fn date_to_value(date: NaiveDate) -> Value {
    Value::String(date.format("%Y-%m-%d").to_string())
}

/// Stores an amount as its exact decimal string.
#[must_use]
pub fn decimal_to_value(amount: Decimal) -> Value {
    Value::String(amount.to_string())
}

/// Reads a stored amount: a JSON number, or the decimal string written by
/// [`decimal_to_value`]. Anything else is `None`.
#[must_use]
pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => number_to_decimal(n),
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}

/// Converts a JSON number to a decimal without going through float math.
#[must_use]
pub fn number_to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Parses a stored date: `YYYY-MM-DD`, or an RFC 3339 timestamp whose
/// UTC calendar date is used.
#[must_use]
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

fn optional_string(doc: &Map<String, Value>, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn option_to_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::String(v.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn meta() -> RecordMeta {
        RecordMeta {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn read_expense(value: Value) -> Option<Expense> {
        normalize_expense(&meta(), UserId::new(), &doc(value))
    }

    fn read_budget(value: Value) -> Option<Budget> {
        normalize_budget(&meta(), UserId::new(), &doc(value))
    }

    #[test]
    fn test_well_formed_expense() {
        let expense = read_expense(json!({
            "amount": 42.5,
            "category": "Food",
            "date": "2024-01-15",
            "name": "Dinner",
        }))
        .unwrap();

        assert_eq!(expense.amount, dec!(42.5));
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(expense.name.as_deref(), Some("Dinner"));
        assert!(expense.description.is_none());
    }

    #[test]
    fn test_non_numeric_amounts_count_as_zero() {
        for amount in [json!("abc"), json!(""), json!(null), json!(true), json!({"v": 1})] {
            let expense = read_expense(json!({
                "amount": amount,
                "category": "Food",
                "date": "2024-01-15",
            }))
            .unwrap();
            assert_eq!(expense.amount, Decimal::ZERO);
        }
    }

    #[test]
    fn test_missing_amount_counts_as_zero() {
        let expense = read_expense(json!({"category": "Food", "date": "2024-01-15"})).unwrap();
        assert_eq!(expense.amount, Decimal::ZERO);
    }

    #[test]
    fn test_negative_amount_counts_as_zero() {
        let expense =
            read_expense(json!({"amount": -5, "category": "Food", "date": "2024-01-15"})).unwrap();
        assert_eq!(expense.amount, Decimal::ZERO);
    }

    #[test]
    fn test_missing_category_becomes_empty() {
        let expense = read_expense(json!({"amount": 3, "date": "2024-01-15"})).unwrap();
        assert_eq!(expense.category, "");
    }

    #[test]
    fn test_unparseable_date_drops_expense() {
        assert!(read_expense(json!({"amount": 3, "category": "Food", "date": "yesterday"})).is_none());
        assert!(read_expense(json!({"amount": 3, "category": "Food"})).is_none());
        assert!(read_expense(json!({"amount": 3, "category": "Food", "date": 20240115})).is_none());
    }

    #[test]
    fn test_rfc3339_date_uses_utc_day() {
        let expense = read_expense(json!({
            "amount": 3,
            "category": "Food",
            "date": "2024-01-15T23:30:00-02:00",
        }))
        .unwrap();
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
    }

    #[test]
    fn test_expense_document_round_trip() {
        let owner = UserId::new();
        let input = NewExpense {
            amount: dec!(19.99),
            category: "Shopping".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            name: None,
            description: Some("Socks".to_string()),
        };

        let stored = expense_document(owner, &input);
        assert_eq!(stored["date"], json!("2024-02-29"));
        assert_eq!(stored["amount"], json!("19.99"));

        let expense = normalize_expense(&meta(), owner, &stored).unwrap();
        assert_eq!(expense.amount, dec!(19.99));
        assert_eq!(expense.description.as_deref(), Some("Socks"));
        assert!(expense.name.is_none());
    }

    #[test]
    fn test_decimal_string_amount_is_read_exactly() {
        let expense = read_expense(json!({
            "amount": "12.50",
            "category": "Food",
            "date": "2024-01-15",
        }))
        .unwrap();
        assert_eq!(expense.amount, dec!(12.50));
    }

    #[test]
    fn test_high_precision_amount_survives_storage() {
        let owner = UserId::new();
        let input = NewExpense {
            amount: dec!(12345678901234567.89),
            category: "Bills".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            name: None,
            description: None,
        };

        let stored = expense_document(owner, &input);
        assert_eq!(stored["amount"], json!("12345678901234567.89"));

        let expense = normalize_expense(&meta(), owner, &stored).unwrap();
        assert_eq!(expense.amount, dec!(12345678901234567.89));

        let budget = NewBudget {
            category: "Bills".to_string(),
            amount: dec!(98765432109876543.21),
            period: BudgetPeriod::Monthly,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: None,
            notes: None,
        };
        let read_back = normalize_budget(&meta(), owner, &budget_document(owner, &budget)).unwrap();
        assert_eq!(read_back.amount, dec!(98765432109876543.21));
    }

    #[test]
    fn test_well_formed_budget() {
        let budget = read_budget(json!({
            "amount": 200,
            "category": "Food",
            "period": "monthly",
            "start_date": "2024-01-01",
            "end_date": null,
        }))
        .unwrap();

        assert_eq!(budget.amount, dec!(200));
        assert_eq!(budget.period, BudgetPeriod::Monthly);
        assert!(budget.end_date.is_none());
    }

    #[test]
    fn test_invalid_budgets_are_dropped() {
        let base = json!({
            "amount": 200,
            "category": "Food",
            "period": "monthly",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
        });
        assert!(read_budget(base.clone()).is_some());

        let broken = [
            ("amount", json!(0)),
            ("amount", json!(-1)),
            ("amount", json!("lots")),
            ("amount", json!("-3")),
            ("category", json!(null)),
            ("period", json!("daily")),
            ("start_date", json!("soon")),
            ("end_date", json!("never")),
            ("end_date", json!("2023-12-31")),
        ];
        for (field, value) in broken {
            let mut value_doc = base.clone();
            value_doc[field] = value;
            assert!(read_budget(value_doc).is_none(), "{field} should be rejected");
        }
    }

    #[test]
    fn test_number_to_decimal() {
        assert_eq!(number_to_decimal(&Number::from(7)), Some(dec!(7)));
        assert_eq!(
            number_to_decimal(&Number::from_str("0.1").unwrap()),
            Some(dec!(0.1))
        );
        assert_eq!(
            number_to_decimal(&Number::from_str("1e3").unwrap()),
            Some(dec!(1000))
        );
    }
}
