//! Per-user settings.

use serde::{Deserialize, Serialize};
use spendwise_shared::types::Currency;

/// UI color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

/// UI language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Spanish.
    Es,
    /// French.
    Fr,
    /// German.
    De,
    /// Japanese.
    Ja,
}

/// Preferences stored with a user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Display currency. Amounts are never converted.
    pub currency: Currency,
    /// UI language.
    pub language: Language,
    /// UI theme.
    pub theme: Theme,
    /// Notify when a budget reaches its warning threshold.
    pub budget_alerts: bool,
    /// Send a weekly spending report.
    pub weekly_reports: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            language: Language::default(),
            theme: Theme::default(),
            budget_alerts: true,
            weekly_reports: true,
        }
    }
}

/// Partial settings update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsUpdate {
    /// Display currency.
    pub currency: Option<Currency>,
    /// UI language.
    pub language: Option<Language>,
    /// UI theme.
    pub theme: Option<Theme>,
    /// Budget alert notifications.
    pub budget_alerts: Option<bool>,
    /// Weekly report notifications.
    pub weekly_reports: Option<bool>,
}

impl UserSettings {
    /// Applies `update`, returning the merged settings.
    #[must_use]
    pub fn merged(self, update: &SettingsUpdate) -> Self {
        Self {
            currency: update.currency.unwrap_or(self.currency),
            language: update.language.unwrap_or(self.language),
            theme: update.theme.unwrap_or(self.theme),
            budget_alerts: update.budget_alerts.unwrap_or(self.budget_alerts),
            weekly_reports: update.weekly_reports.unwrap_or(self.weekly_reports),
        }
    }
}
