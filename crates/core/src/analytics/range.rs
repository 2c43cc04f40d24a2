//! Relative time ranges and inclusive date windows.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A time range relative to today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// The last 7 days.
    Week,
    /// Since the first of the current month.
    #[default]
    Month,
    /// Since the same day three months ago.
    Quarter,
    /// Since January 1st.
    Year,
    /// Everything.
    All,
}

impl TimeRange {
    /// First day of the range, or `None` for [`TimeRange::All`].
    #[must_use]
    pub fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Week => today.checked_sub_days(Days::new(7)),
            Self::Month => today.with_day(1),
            Self::Quarter => today.checked_sub_months(Months::new(3)),
            Self::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            Self::All => None,
        }
    }

    /// Returns true if `date` falls in the range ending today.
    #[must_use]
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        self.start(today).is_none_or(|start| date >= start) && date <= today
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day.
    pub from: NaiveDate,
    /// Last day.
    pub to: NaiveDate,
}

impl DateWindow {
    /// Creates a window, swapping the bounds if they are reversed.
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if to < from {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    /// The calendar month containing `today`.
    #[must_use]
    pub fn month_of(today: NaiveDate) -> Self {
        let from = today.with_day(1).unwrap_or(today);
        let to = from
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(today);
        Self { from, to }
    }

    /// Number of days in the window.
    #[must_use]
    pub fn len_days(&self) -> u64 {
        u64::try_from((self.to - self.from).num_days() + 1).unwrap_or(1)
    }

    /// The window of equal length immediately before this one.
    #[must_use]
    pub fn previous(&self) -> Self {
        let to = self.from.pred_opt().unwrap_or(self.from);
        let from = self
            .from
            .checked_sub_days(Days::new(self.len_days()))
            .unwrap_or(to);
        Self { from, to }
    }

    /// Returns true if `date` lies inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}
