//! Outlay Core Library
//!
//! Shared functionality for the Outlay receipt expense manager:
//! - Extraction parser for generative-AI receipt replies
//! - Keyword-based expense categorizer
//! - Pluggable AI backends (Gemini, mock)
//! - Pluggable receipt image storage (GCS, local directory)
//! - SQLite persistence for expense records
//! - The ingestion pipeline tying the pieces together

pub mod ai;
pub mod category;
pub mod db;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod storage;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AiBackend, AiClient, GeminiBackend, MockBackend};
pub use category::{categorize, categorize_description};
pub use db::Database;
pub use error::{Error, Result};
pub use extract::parse;
pub use ingest::{ingest_receipt, IngestOutcome};
pub use models::{
    Category, CategoryTotal, ExpenseFilter, ExpenseRecord, ExtractedRecord, NewExpense,
};
pub use storage::{GcsConfig, GcsStore, LocalStore, StorageBackend, StorageClient};
