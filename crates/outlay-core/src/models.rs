//! Domain models for Outlay

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Expense category assigned by keyword matching
///
/// The set is closed; anything that doesn't match a keyword table entry
/// falls back to `Miscellaneous`. See [`crate::category::categorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Travel,
    Food,
    Office,
    Fuel,
    #[default]
    Miscellaneous,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Food => "food",
            Self::Office => "office",
            Self::Fuel => "fuel",
            Self::Miscellaneous => "miscellaneous",
        }
    }

    /// All categories in their fixed matching order
    pub fn all() -> &'static [Category] {
        &[
            Self::Travel,
            Self::Food,
            Self::Office,
            Self::Fuel,
            Self::Miscellaneous,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "travel" => Ok(Self::Travel),
            "food" => Ok(Self::Food),
            "office" => Ok(Self::Office),
            "fuel" => Ok(Self::Fuel),
            "miscellaneous" => Ok(Self::Miscellaneous),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // pad() keeps width/alignment specifiers working in table output
        f.pad(self.as_str())
    }
}

/// Structured fields pulled out of a model's free-text receipt reply
///
/// Every field carries a default so a reply the parser can't make sense of
/// still produces a complete record. See [`crate::extract::parse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub description: String,
    pub date: String,
    pub amount: f64,
}

impl Default for ExtractedRecord {
    fn default() -> Self {
        Self {
            description: "Unknown".to_string(),
            date: "Unknown".to_string(),
            amount: 0.0,
        }
    }
}

/// A persisted expense
///
/// Created once per successful receipt upload and immutable afterwards;
/// there is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub description: String,
    /// Date as extracted from the receipt ("Unknown" when not found)
    pub date: String,
    pub amount: f64,
    pub category: Category,
    /// Locator into object storage (e.g. "gs://bucket/key" or a file path)
    pub image_path: String,
    /// SHA256 of the uploaded image, for deduplication
    pub content_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// New expense for creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub date: String,
    pub amount: f64,
    pub category: Category,
    pub image_path: String,
    pub content_hash: Option<String>,
}

/// Filter for listing expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Restrict to a single category
    pub category: Option<Category>,
    /// Maximum rows to return (capped by the database layer)
    pub limit: Option<i64>,
    /// Rows to skip
    pub offset: Option<i64>,
}

/// Per-category spending summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total_amount: f64,
    pub expense_count: i64,
}
