//! Budget status calculation.
//!
//! Status is derived on demand from a budget and an unfiltered set of
//! expenses. An expense counts toward a budget when its category equals the
//! budget's category exactly and its date lies within the budget window,
//! both ends inclusive. A budget without an end date runs through `today`.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use super::types::{Budget, BudgetHealth, BudgetStatus};
use crate::expense::Expense;

/// Percentage at which a budget turns to [`BudgetHealth::Warning`].
pub const WARNING_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Percentage at which a budget turns to [`BudgetHealth::Over`].
pub const OVER_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

impl BudgetHealth {
    /// Classifies a spent percentage.
    #[must_use]
    pub fn classify(percentage_spent: Decimal) -> Self {
        if percentage_spent >= OVER_THRESHOLD {
            Self::Over
        } else if percentage_spent >= WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Under
        }
    }
}

/// Returns true if `expense` counts toward `budget` as of `today`.
#[must_use]
pub fn is_attributed(budget: &Budget, expense: &Expense, today: NaiveDate) -> bool {
    let end = budget.end_date.unwrap_or(today);
    expense.category == budget.category && expense.date >= budget.start_date && expense.date <= end
}

/// Computes the status of `budget` against `expenses` as of `today`.
///
/// The result never fails for a budget with a positive amount. Totals
/// saturate instead of overflowing.
#[must_use]
pub fn calculate_budget_status(budget: &Budget, expenses: &[Expense], today: NaiveDate) -> BudgetStatus {
    let total_spent = expenses
        .iter()
        .filter(|e| is_attributed(budget, e, today))
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount));

    let remaining = budget.amount.saturating_sub(total_spent);
    let percentage_spent = percentage_of(total_spent, budget.amount);

    BudgetStatus {
        budget: budget.clone(),
        total_spent,
        remaining,
        percentage_spent,
        status: BudgetHealth::classify(percentage_spent),
    }
}

/// `spent / amount * 100`. A zero amount yields 0; a ratio too large for
/// `Decimal` saturates to `Decimal::MAX`.
fn percentage_of(spent: Decimal, amount: Decimal) -> Decimal {
    if amount.is_zero() {
        return Decimal::ZERO;
    }
    spent
        .checked_div(amount)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}

/// Computes the status of `budget` using today's UTC date.
#[must_use]
pub fn calculate_budget_status_now(budget: &Budget, expenses: &[Expense]) -> BudgetStatus {
    calculate_budget_status(budget, expenses, Utc::now().date_naive())
}
