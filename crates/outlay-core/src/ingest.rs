//! Receipt ingestion pipeline
//!
//! One linear flow per uploaded receipt: hash and dedup, store the image,
//! ask the AI backend for an extraction, parse the reply, categorize, and
//! persist the expense. Shared by the server upload handler and the CLI
//! `process` command.
//!
//! The extraction parser and categorizer never fail; a reply the parser
//! can't use produces a record with defaults rather than an error. AI and
//! storage failures do propagate - an expense is never persisted without a
//! stored image and an extraction attempt.

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::ai::{AiBackend, AiClient};
use crate::category::categorize;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::extract::parse;
use crate::models::{ExpenseRecord, ExtractedRecord, NewExpense};
use crate::storage::{object_key, StorageBackend, StorageClient};

/// Result of ingesting one receipt
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The persisted expense
    pub expense: ExpenseRecord,
    /// Structured fields as parsed from the model reply
    pub extracted: ExtractedRecord,
    /// The model's raw reply text
    pub raw_reply: String,
}

/// Run the full pipeline for one uploaded receipt image
pub async fn ingest_receipt(
    db: &Database,
    storage: &StorageClient,
    ai: &AiClient,
    data: &[u8],
    file_name: Option<&str>,
    mime_type: &str,
) -> Result<IngestOutcome> {
    if data.is_empty() {
        return Err(Error::InvalidData("No image data provided".to_string()));
    }

    // Content hash for deduplication and key generation
    let mut hasher = Sha256::new();
    hasher.update(data);
    let content_hash = hex::encode(hasher.finalize());

    if let Some(existing) = db.get_expense_by_hash(&content_hash)? {
        return Err(Error::Duplicate(format!(
            "Receipt already processed as expense {}",
            existing.id
        )));
    }

    // Store the image first; the expense only keeps the locator
    let key = object_key(&content_hash, mime_type);
    let image_path = storage.store(&key, data, mime_type).await?;
    info!(
        backend = storage.name(),
        key = %key,
        file_name = file_name.unwrap_or("unnamed"),
        "Stored receipt image"
    );

    // Extraction: model reply -> structured fields -> category
    let raw_reply = ai.extract_receipt(data, mime_type).await?;
    debug!(model = ai.model(), "AI reply: {}", raw_reply);

    let extracted = parse(&raw_reply);
    let category = categorize(&extracted);
    info!(
        description = %extracted.description,
        amount = extracted.amount,
        category = %category,
        "Categorized receipt"
    );

    let new_expense = NewExpense {
        description: extracted.description.clone(),
        date: extracted.date.clone(),
        amount: extracted.amount,
        category,
        image_path,
        content_hash: Some(content_hash),
    };

    let id = db.insert_expense(&new_expense)?;
    let expense = db
        .get_expense(id)?
        .ok_or_else(|| Error::NotFound("Expense not found after creation".to_string()))?;

    Ok(IngestOutcome {
        expense,
        extracted,
        raw_reply,
    })
}
