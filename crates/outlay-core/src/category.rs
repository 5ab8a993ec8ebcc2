//! Keyword-based expense categorization
//!
//! Maps an extracted description to one of the fixed [`Category`] labels by
//! substring matching against a keyword table. The table is an ordered slice,
//! not a map: categories are checked in declaration order and the first one
//! with any matching keyword wins, so a description like "coffee and a cab"
//! resolves to travel, never food. No match means `Miscellaneous`.

use crate::models::{Category, ExtractedRecord};

/// Keyword table in fixed matching order
///
/// Order is semantic: travel is checked before food, food before office,
/// office before fuel. Keep it a slice so the tie-break stays explicit.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Travel, &["flight", "hotel", "cab"]),
    (Category::Food, &["restaurant", "grocery", "coffee"]),
    (Category::Office, &["supplies", "software", "furniture"]),
    (Category::Fuel, &["petrol", "diesel", "gas"]),
];

/// Categorize an extracted record by its description
///
/// Total function: always returns a label. An empty or whitespace-only
/// description falls through to `Miscellaneous`.
pub fn categorize(record: &ExtractedRecord) -> Category {
    categorize_description(&record.description)
}

/// Categorize a raw description string
pub fn categorize_description(description: &str) -> Category {
    if description.trim().is_empty() {
        return Category::Miscellaneous;
    }

    let lowered = description.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *category;
        }
    }

    Category::Miscellaneous
}
