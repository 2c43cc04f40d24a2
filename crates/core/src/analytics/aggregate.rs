//! Aggregations over expense listings.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use super::range::DateWindow;
use crate::budget::{Budget, BudgetPeriod};
use crate::category::FALLBACK_CATEGORY;
use crate::expense::Expense;

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Category name.
    pub category: String,
    /// Sum of amounts.
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
}

/// Total spent on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// Calendar date.
    pub date: NaiveDate,
    /// Sum of amounts.
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
}

/// A category's share of total spending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// Category name.
    pub category: String,
    /// Sum of amounts.
    pub total: Decimal,
    /// Whole-number percentage of the grand total.
    pub percentage: i64,
}

/// Daily total with its trailing average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingAveragePoint {
    /// Calendar date.
    pub date: NaiveDate,
    /// Total for the day.
    pub total: Decimal,
    /// Average of this and up to `window - 1` preceding points.
    pub average: Decimal,
}

/// Headline figures for a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingSummary {
    /// Sum of amounts.
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
    /// Average amount per expense, 0 when empty.
    pub average: Decimal,
}

impl SpendingSummary {
    /// Summarizes `expenses`.
    #[must_use]
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let total = sum(expenses.iter().map(|e| e.amount));
        let count = expenses.len();
        let average = if count == 0 {
            Decimal::ZERO
        } else {
            total
                .checked_div(Decimal::from(count))
                .map_or(Decimal::ZERO, |avg| avg.round_dp(2))
        };
        Self {
            total,
            count,
            average,
        }
    }
}

/// Spending in one window compared with the window before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodComparison {
    /// Total in the current window.
    pub current_total: Decimal,
    /// Total in the previous window.
    pub previous_total: Decimal,
    /// `current_total - previous_total`.
    pub change_amount: Decimal,
    /// Whole-number change relative to the previous total, 0 when that is 0.
    pub change_percentage: i64,
}

impl PeriodComparison {
    /// Compares two totals.
    #[must_use]
    pub fn new(current_total: Decimal, previous_total: Decimal) -> Self {
        let change_amount = current_total.saturating_sub(previous_total);
        let change_percentage = if previous_total.is_zero() {
            0
        } else {
            percent_of(change_amount, previous_total)
        };
        Self {
            current_total,
            previous_total,
            change_amount,
            change_percentage,
        }
    }
}

/// `part / whole * 100`, rounded half away from zero. 0 when `whole` is 0;
/// results beyond `i64` saturate.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> i64 {
    if whole.is_zero() {
        return 0;
    }
    let saturated = if part.is_sign_negative() == whole.is_sign_negative() {
        i64::MAX
    } else {
        i64::MIN
    };
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|p| p.to_i64())
        .unwrap_or(saturated)
}

/// Per-category totals, largest first. Ties are ordered by name.
///
/// Expenses without a category are counted under the fallback category.
#[must_use]
pub fn totals_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for expense in expenses {
        let category = if expense.category.is_empty() {
            FALLBACK_CATEGORY
        } else {
            expense.category.as_str()
        };
        let entry = by_category.entry(category).or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(expense.amount);
        entry.1 += 1;
    }

    let mut totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    totals
}

/// Per-day totals in ascending date order. Days without spending are omitted.
#[must_use]
pub fn totals_by_day(expenses: &[Expense]) -> Vec<DailyTotal> {
    let mut by_day: BTreeMap<NaiveDate, (Decimal, usize)> = BTreeMap::new();
    for expense in expenses {
        let entry = by_day.entry(expense.date).or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(expense.amount);
        entry.1 += 1;
    }
    by_day
        .into_iter()
        .map(|(date, (total, count))| DailyTotal { date, total, count })
        .collect()
}

/// The `n` largest categories with their share of the grand total.
#[must_use]
pub fn top_categories(expenses: &[Expense], n: usize) -> Vec<CategoryShare> {
    let grand_total = sum(expenses.iter().map(|e| e.amount));
    totals_by_category(expenses)
        .into_iter()
        .take(n)
        .map(|t| CategoryShare {
            percentage: percent_of(t.total, grand_total),
            category: t.category,
            total: t.total,
        })
        .collect()
}

/// Trailing moving average over consecutive points of a daily series.
#[must_use]
pub fn moving_average(daily: &[DailyTotal], window: usize) -> Vec<MovingAveragePoint> {
    let window = window.max(1);
    daily
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let slice = &daily[i.saturating_sub(window - 1)..=i];
            let total = sum(slice.iter().map(|p| p.total));
            let average = total
                .checked_div(Decimal::from(slice.len()))
                .map_or(Decimal::ZERO, |avg| avg.round_dp(2));
            MovingAveragePoint {
                date: point.date,
                total: point.total,
                average,
            }
        })
        .collect()
}

/// Monthly budgets that overlap the calendar month containing `today`.
#[must_use]
pub fn current_month_budgets(budgets: &[Budget], today: NaiveDate) -> Vec<Budget> {
    let month = DateWindow::month_of(today);
    budgets
        .iter()
        .filter(|b| {
            b.period == BudgetPeriod::Monthly
                && b.start_date <= month.to
                && b.end_date.is_none_or(|end| end >= month.from)
        })
        .cloned()
        .collect()
}

fn sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}
