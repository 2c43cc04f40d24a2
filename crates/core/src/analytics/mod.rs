//! Spending analytics.
//!
//! This module provides:
//! - Relative time ranges and date windows
//! - Per-category and per-day aggregates
//! - The dashboard and analytics reports built from them

pub mod aggregate;
pub mod range;
pub mod report;


pub use aggregate::{
    CategoryShare, CategoryTotal, DailyTotal, MovingAveragePoint, PeriodComparison,
    SpendingSummary, current_month_budgets, moving_average, percent_of, top_categories,
    totals_by_category, totals_by_day,
};
pub use range::{DateWindow, TimeRange};
pub use report::{
    AnalyticsReport, DashboardSummary, RECENT_EXPENSES, TOP_CATEGORIES, TREND_WINDOW_DAYS,
    build_analytics, build_dashboard,
};
