//! CSV export of expenses.

use chrono::NaiveDate;
use thiserror::Error;

use crate::expense::Expense;

/// Column headers of the export.
pub const CSV_HEADERS: [&str; 4] = ["Name", "Amount", "Category", "Date"];

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing a record failed.
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Finishing the output buffer failed.
    #[error("Failed to finish CSV output: {0}")]
    Buffer(String),
}

/// Writes `expenses` as CSV in the given order.
///
/// # Errors
///
/// Returns an error if a record cannot be written.
pub fn expenses_to_csv(expenses: &[Expense]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for expense in expenses {
        let amount = expense.amount.to_string();
        let date = expense.date.format("%Y-%m-%d").to_string();
        writer.write_record([
            expense.name.as_deref().unwrap_or_default(),
            amount.as_str(),
            expense.category.as_str(),
            date.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

/// Download filename for an export made on `today`.
#[must_use]
pub fn export_filename(today: NaiveDate) -> String {
    format!("expenses_{}.csv", today.format("%Y-%m-%d"))
}
