//! Integration tests for outlay-core
//!
//! These tests exercise the full upload → extract → categorize → persist
//! workflow through the public API, with a mock AI backend and a local
//! storage directory.

use outlay_core::{
    ai::{AiClient, MockBackend},
    db::Database,
    ingest::ingest_receipt,
    models::{Category, ExpenseFilter},
    storage::{StorageBackend, StorageClient},
};
use tempfile::TempDir;

fn mock_ai(reply: &str) -> AiClient {
    AiClient::Mock(MockBackend::with_reply(reply))
}

#[tokio::test]
async fn test_full_ingest_workflow() {
    let tmp = TempDir::new().unwrap();
    let db = Database::in_memory().unwrap();
    let storage = StorageClient::local(tmp.path());
    let ai = mock_ai("description: Flight to NYC\ndate: 2024-01-05\namount: 450.75");

    let outcome = ingest_receipt(&db, &storage, &ai, b"jpeg bytes", Some("trip.jpg"), "image/jpeg")
        .await
        .expect("ingest failed");

    // Extraction fields flowed through to the persisted expense
    assert_eq!(outcome.expense.description, "Flight to NYC");
    assert_eq!(outcome.expense.date, "2024-01-05");
    assert_eq!(outcome.expense.amount, 450.75);
    assert_eq!(outcome.expense.category, Category::Travel);

    // The image landed in storage at the recorded locator
    let stored = std::fs::read(&outcome.expense.image_path).expect("image not stored");
    assert_eq!(stored, b"jpeg bytes");

    // And the expense is visible through the listing API
    let listed = db.list_expenses(&ExpenseFilter::default()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, outcome.expense.id);
}

#[tokio::test]
async fn test_multiple_receipts_summarize_by_category() {
    let tmp = TempDir::new().unwrap();
    let db = Database::in_memory().unwrap();
    let storage = StorageClient::local(tmp.path());

    let receipts: &[(&[u8], &str)] = &[
        (b"r1", "description: hotel in portland\namount: 210.00"),
        (b"r2", "description: coffee and pastry\namount: 9.50"),
        (b"r3", "description: diesel fill-up\namount: 75.25"),
        (b"r4", "description: mystery purchase\namount: 5.00"),
    ];

    for (bytes, reply) in receipts {
        let ai = mock_ai(reply);
        ingest_receipt(&db, &storage, &ai, bytes, None, "image/jpeg")
            .await
            .unwrap();
    }

    assert_eq!(db.count_expenses().unwrap(), 4);

    let totals = db.category_totals().unwrap();
    let by_category: std::collections::HashMap<_, _> = totals
        .iter()
        .map(|t| (t.category, t.total_amount))
        .collect();

    assert_eq!(by_category[&Category::Travel], 210.00);
    assert_eq!(by_category[&Category::Food], 9.50);
    assert_eq!(by_category[&Category::Fuel], 75.25);
    assert_eq!(by_category[&Category::Miscellaneous], 5.00);
}

#[tokio::test]
async fn test_same_image_twice_is_a_duplicate() {
    let tmp = TempDir::new().unwrap();
    let db = Database::in_memory().unwrap();
    let storage = StorageClient::local(tmp.path());
    let ai = mock_ai("description: cab fare\namount: 18.00");

    ingest_receipt(&db, &storage, &ai, b"identical", None, "image/png")
        .await
        .unwrap();
    let second = ingest_receipt(&db, &storage, &ai, b"identical", None, "image/png").await;

    assert!(matches!(second, Err(outlay_core::Error::Duplicate(_))));
    assert_eq!(db.count_expenses().unwrap(), 1);
}

#[tokio::test]
async fn test_unparseable_reply_still_persists_a_complete_record() {
    let tmp = TempDir::new().unwrap();
    let db = Database::in_memory().unwrap();
    let storage = StorageClient::local(tmp.path());
    let ai = mock_ai("I could not read this receipt, sorry!");

    let outcome = ingest_receipt(&db, &storage, &ai, b"blurry photo", None, "image/jpeg")
        .await
        .unwrap();

    assert_eq!(outcome.expense.description, "Unknown");
    assert_eq!(outcome.expense.date, "Unknown");
    assert_eq!(outcome.expense.amount, 0.0);
    assert_eq!(outcome.expense.category, Category::Miscellaneous);
}

#[tokio::test]
async fn test_storage_round_trip_through_client_enum() {
    let tmp = TempDir::new().unwrap();
    let storage = StorageClient::local(tmp.path());

    let locator = storage
        .store("receipt_itest.jpg", b"bytes", "image/jpeg")
        .await
        .unwrap();
    assert_eq!(locator, storage.locator("receipt_itest.jpg"));
    assert_eq!(storage.fetch("receipt_itest.jpg").await.unwrap(), b"bytes");

    storage.delete("receipt_itest.jpg").await.unwrap();
    assert!(storage.fetch("receipt_itest.jpg").await.is_err());
}
