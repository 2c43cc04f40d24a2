//! Budget data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendwise_shared::types::{BudgetId, UserId};

use super::error::BudgetError;
use crate::category::is_known_category;

/// Maximum number of characters in budget notes.
pub const MAX_NOTES_LENGTH: usize = 500;

/// Recurrence of a budget.
///
/// The period is descriptive: status is always computed over the
/// budget's own start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// Weekly budget.
    Weekly,
    /// Monthly budget.
    Monthly,
    /// Yearly budget.
    Yearly,
}

impl BudgetPeriod {
    /// Returns the lowercase name used in storage and the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown budget period: {s}")),
        }
    }
}

/// A spending target for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Category the budget tracks, compared exactly.
    pub category: String,
    /// Target amount, always positive.
    pub amount: Decimal,
    /// Recurrence.
    pub period: BudgetPeriod,
    /// First day counted.
    pub start_date: NaiveDate,
    /// Last day counted. Open-ended budgets run through today.
    pub end_date: Option<NaiveDate>,
    /// Optional notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or fully replacing a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBudget {
    /// Category to track.
    pub category: String,
    /// Target amount.
    pub amount: Decimal,
    /// Recurrence.
    pub period: BudgetPeriod,
    /// First day counted.
    pub start_date: NaiveDate,
    /// Last day counted.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewBudget {
    /// Validates the input.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input violates.
    pub fn validate(&self) -> Result<(), BudgetError> {
        if self.amount <= Decimal::ZERO {
            return Err(BudgetError::NonPositiveAmount);
        }
        if self.end_date.is_some_and(|end| end < self.start_date) {
            return Err(BudgetError::EndBeforeStart);
        }
        if !is_known_category(&self.category) {
            return Err(BudgetError::UnknownCategory(self.category.clone()));
        }
        if self
            .notes
            .as_ref()
            .is_some_and(|n| n.chars().count() > MAX_NOTES_LENGTH)
        {
            return Err(BudgetError::NotesTooLong(MAX_NOTES_LENGTH));
        }
        Ok(())
    }
}

/// Spending health of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealth {
    /// Below the warning threshold.
    Under,
    /// At or above 80% but below 100%.
    Warning,
    /// At or above 100%.
    Over,
}

/// Computed status of a budget. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    /// The budget this status describes.
    pub budget: Budget,
    /// Sum of attributed expense amounts.
    pub total_spent: Decimal,
    /// Target minus spent; negative once over budget.
    pub remaining: Decimal,
    /// Spent as a percentage of the target, unrounded and unbounded.
    pub percentage_spent: Decimal,
    /// Health classification.
    pub status: BudgetHealth,
}

#[cfg(test)]
mod type_tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> NewBudget {
        NewBudget {
            category: "Food".to_string(),
            amount: dec!(200),
            period: BudgetPeriod::Monthly,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            notes: None,
        }
    }

    #[test]
    fn test_valid_budget() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_single_day_budget_is_valid() {
        let budget = NewBudget {
            end_date: Some(input().start_date),
            ..input()
        };
        assert!(budget.validate().is_ok());
    }

    #[test]
    fn test_amount_must_be_positive() {
        for amount in [Decimal::ZERO, dec!(-5)] {
            let budget = NewBudget { amount, ..input() };
            assert_eq!(budget.validate(), Err(BudgetError::NonPositiveAmount));
        }
    }

    #[test]
    fn test_end_before_start_rejected() {
        let budget = NewBudget {
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31),
            ..input()
        };
        assert_eq!(budget.validate(), Err(BudgetError::EndBeforeStart));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let budget = NewBudget {
            category: "Snacks".to_string(),
            ..input()
        };
        assert_eq!(
            budget.validate(),
            Err(BudgetError::UnknownCategory("Snacks".to_string()))
        );
    }

    #[test]
    fn test_period_serde() {
        assert_eq!(
            serde_json::to_string(&BudgetPeriod::Weekly).unwrap(),
            "\"weekly\""
        );
        assert_eq!("yearly".parse::<BudgetPeriod>(), Ok(BudgetPeriod::Yearly));
        assert!("Monthly".parse::<BudgetPeriod>().is_err());
    }

    #[test]
    fn test_health_ordering_follows_severity() {
        assert!(BudgetHealth::Under < BudgetHealth::Warning);
        assert!(BudgetHealth::Warning < BudgetHealth::Over);
        assert_eq!(serde_json::to_string(&BudgetHealth::Over).unwrap(), "\"over\"");
    }
}
