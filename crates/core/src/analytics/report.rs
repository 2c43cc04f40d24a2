//! Dashboard and analytics reports.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregate::{
    CategoryShare, CategoryTotal, DailyTotal, MovingAveragePoint, PeriodComparison,
    SpendingSummary, current_month_budgets, moving_average, percent_of, top_categories,
    totals_by_category, totals_by_day,
};
use super::range::{DateWindow, TimeRange};
use crate::budget::{Budget, BudgetStatus, calculate_budget_status};
use crate::expense::{Expense, SortDirection, SortField, sort_expenses};

/// Number of categories in the top-categories breakdown.
pub const TOP_CATEGORIES: usize = 5;

/// Number of recent expenses on the dashboard.
pub const RECENT_EXPENSES: usize = 5;

/// Points in the trailing average of the daily series.
pub const TREND_WINDOW_DAYS: usize = 7;

/// Everything the dashboard shows for a date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The window being reported.
    pub window: DateWindow,
    /// Totals for the window.
    pub summary: SpendingSummary,
    /// Comparison with the preceding window of equal length.
    pub comparison: PeriodComparison,
    /// Largest categories in the window.
    pub top_categories: Vec<CategoryShare>,
    /// All categories in the window.
    pub by_category: Vec<CategoryTotal>,
    /// Daily totals with a trailing average.
    pub daily: Vec<MovingAveragePoint>,
    /// Most recent expenses in the window.
    pub recent: Vec<Expense>,
    /// Status of every monthly budget active this month.
    pub budgets: Vec<BudgetStatus>,
    /// Sum of this month's budget amounts.
    pub total_budget: Decimal,
    /// Window spending as a whole-number percentage of `total_budget`.
    pub budget_utilization: i64,
}

/// Aggregates for the analytics view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Requested range.
    pub range: TimeRange,
    /// First day included, absent for [`TimeRange::All`].
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: NaiveDate,
    /// Totals for the range.
    pub summary: SpendingSummary,
    /// Per-category totals.
    pub by_category: Vec<CategoryTotal>,
    /// Per-day totals.
    pub by_day: Vec<DailyTotal>,
    /// Largest categories.
    pub top_categories: Vec<CategoryShare>,
}

/// Builds the dashboard from all of a user's expenses and budgets.
///
/// Budget statuses are computed against the full expense list, not just
/// the window, so they agree with the budget screens.
#[must_use]
pub fn build_dashboard(
    window: DateWindow,
    expenses: &[Expense],
    budgets: &[Budget],
    today: NaiveDate,
) -> DashboardSummary {
    let previous = window.previous();
    let mut current: Vec<Expense> = expenses
        .iter()
        .filter(|e| window.contains(e.date))
        .cloned()
        .collect();
    let previous_total = SpendingSummary::from_expenses(
        &expenses
            .iter()
            .filter(|e| previous.contains(e.date))
            .cloned()
            .collect::<Vec<_>>(),
    )
    .total;

    let summary = SpendingSummary::from_expenses(&current);
    let comparison = PeriodComparison::new(summary.total, previous_total);

    let budgets: Vec<BudgetStatus> = current_month_budgets(budgets, today)
        .iter()
        .map(|b| calculate_budget_status(b, expenses, today))
        .collect();
    let total_budget = budgets
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.budget.amount));

    sort_expenses(&mut current, SortField::Date, SortDirection::Desc);

    DashboardSummary {
        window,
        top_categories: top_categories(&current, TOP_CATEGORIES),
        by_category: totals_by_category(&current),
        daily: moving_average(&totals_by_day(&current), TREND_WINDOW_DAYS),
        recent: current.iter().take(RECENT_EXPENSES).cloned().collect(),
        budget_utilization: percent_of(summary.total, total_budget),
        total_budget,
        comparison,
        summary,
        budgets,
    }
}

/// Builds the analytics report for `range` ending `today`.
#[must_use]
pub fn build_analytics(expenses: &[Expense], range: TimeRange, today: NaiveDate) -> AnalyticsReport {
    let in_range: Vec<Expense> = expenses
        .iter()
        .filter(|e| range.contains(e.date, today))
        .cloned()
        .collect();

    AnalyticsReport {
        range,
        from: range.start(today),
        to: today,
        summary: SpendingSummary::from_expenses(&in_range),
        by_category: totals_by_category(&in_range),
        by_day: totals_by_day(&in_range),
        top_categories: top_categories(&in_range, TOP_CATEGORIES),
    }
}
