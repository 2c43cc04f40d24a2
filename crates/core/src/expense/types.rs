//! Expense data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendwise_shared::types::{ExpenseId, UserId};

use super::error::ExpenseError;
use crate::category::is_known_category;

/// Maximum number of characters in an expense name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum number of characters in an expense description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// A single recorded outflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Owning user.
    pub user_id: UserId,
    /// Amount spent, never negative.
    pub amount: Decimal,
    /// Category name. Usually one of the known categories, but stored
    /// records are not guaranteed to be.
    pub category: String,
    /// Date the expense occurred.
    pub date: NaiveDate,
    /// Optional short name.
    pub name: Option<String>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or fully replacing an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    /// Amount spent.
    pub amount: Decimal,
    /// Category name.
    pub category: String,
    /// Date the expense occurred.
    pub date: NaiveDate,
    /// Optional short name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl NewExpense {
    /// Validates the input.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input violates.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        if self.amount < Decimal::ZERO {
            return Err(ExpenseError::NegativeAmount);
        }
        if self.category.is_empty() {
            return Err(ExpenseError::EmptyCategory);
        }
        if !is_known_category(&self.category) {
            return Err(ExpenseError::UnknownCategory(self.category.clone()));
        }
        if self
            .name
            .as_ref()
            .is_some_and(|n| n.chars().count() > MAX_NAME_LENGTH)
        {
            return Err(ExpenseError::NameTooLong(MAX_NAME_LENGTH));
        }
        if self
            .description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH)
        {
            return Err(ExpenseError::DescriptionTooLong(MAX_DESCRIPTION_LENGTH));
        }
        Ok(())
    }

    /// Validates the input and returns it with blank text fields cleared.
    ///
    /// # Errors
    ///
    /// See [`Self::validate`].
    pub fn into_validated(mut self) -> Result<Self, ExpenseError> {
        self.validate()?;
        self.name = non_blank(self.name);
        self.description = non_blank(self.description);
        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> NewExpense {
        NewExpense {
            amount: dec!(12.50),
            category: "Food".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            name: Some("Lunch".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_valid_expense() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        let expense = NewExpense {
            amount: Decimal::ZERO,
            ..input()
        };
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let expense = NewExpense {
            amount: dec!(-0.01),
            ..input()
        };
        assert_eq!(expense.validate(), Err(ExpenseError::NegativeAmount));
    }

    #[test]
    fn test_category_rules() {
        let empty = NewExpense {
            category: String::new(),
            ..input()
        };
        assert_eq!(empty.validate(), Err(ExpenseError::EmptyCategory));

        let unknown = NewExpense {
            category: "food".to_string(),
            ..input()
        };
        assert_eq!(
            unknown.validate(),
            Err(ExpenseError::UnknownCategory("food".to_string()))
        );
    }

    #[test]
    fn test_text_length_limits() {
        let long_name = NewExpense {
            name: Some("n".repeat(MAX_NAME_LENGTH + 1)),
            ..input()
        };
        assert_eq!(
            long_name.validate(),
            Err(ExpenseError::NameTooLong(MAX_NAME_LENGTH))
        );

        let long_description = NewExpense {
            description: Some("d".repeat(MAX_DESCRIPTION_LENGTH + 1)),
            ..input()
        };
        assert_eq!(
            long_description.validate(),
            Err(ExpenseError::DescriptionTooLong(MAX_DESCRIPTION_LENGTH))
        );
    }

    #[test]
    fn test_into_validated_clears_blank_text() {
        let expense = NewExpense {
            name: Some("  Coffee ".to_string()),
            description: Some("   ".to_string()),
            ..input()
        }
        .into_validated()
        .unwrap();

        assert_eq!(expense.name.as_deref(), Some("Coffee"));
        assert!(expense.description.is_none());
    }

    #[test]
    fn test_deserialize_accepts_numeric_and_string_amounts() {
        let from_number: NewExpense = serde_json::from_str(
            r#"{"amount": 12.5, "category": "Food", "date": "2024-03-01"}"#,
        )
        .unwrap();
        let from_string: NewExpense = serde_json::from_str(
            r#"{"amount": "12.5", "category": "Food", "date": "2024-03-01"}"#,
        )
        .unwrap();

        assert_eq!(from_number.amount, dec!(12.5));
        assert_eq!(from_string.amount, dec!(12.5));
        assert!(from_number.name.is_none());
    }
}
