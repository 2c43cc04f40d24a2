//! The fixed set of spending categories.
//!
//! Categories are plain strings so that stored records with unexpected
//! values can still be read and displayed. Input validation is the only
//! place that insists on membership in this set.

/// All categories a user can pick, in display order.
pub const CATEGORIES: [&str; 12] = [
    "Food",
    "Transportation",
    "Housing",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Education",
    "Shopping",
    "Personal",
    "Travel",
    "Gifts",
    "Other",
];

/// Category used when a stored record has none.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Returns true if `name` is exactly one of [`CATEGORIES`].
///
/// The comparison is case-sensitive and does not trim.
#[must_use]
pub fn is_known_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}
