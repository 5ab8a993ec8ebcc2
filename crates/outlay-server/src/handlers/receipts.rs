//! Receipt upload handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::Html,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::{AppError, AppState};
use outlay_core::error::Error;
use outlay_core::ingest::ingest_receipt;
use outlay_core::models::ExpenseRecord;

/// Response for receipt upload
#[derive(Debug, Serialize)]
pub struct ReceiptUploadResponse {
    pub message: String,
    pub data: ExpenseRecord,
}

/// POST /api/receipts - Upload a receipt image and run the pipeline
///
/// Expects a multipart form with a `file` part (the image) and an optional
/// `file_name` text part used as a display label in logs.
pub async fn upload_receipt(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ReceiptUploadResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut mime_type = "application/octet-stream".to_string();
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| {
        AppError::bad_request("Invalid multipart body or file too large (max 10MB)")
    })? {
        match field.name() {
            Some("file") => {
                if let Some(ct) = field.content_type() {
                    mime_type = ct.to_string();
                }
                if file_name.is_none() {
                    file_name = field.file_name().map(|n| n.to_string());
                }
                let bytes = field.bytes().await.map_err(|_| {
                    AppError::bad_request("Invalid multipart body or file too large (max 10MB)")
                })?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("file_name") => {
                let name = field.text().await.map_err(|_| {
                    AppError::bad_request("Invalid file_name field")
                })?;
                if !name.trim().is_empty() {
                    file_name = Some(name);
                }
            }
            _ => {}
        }
    }

    let file_bytes = file_bytes
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::bad_request("No image data provided"))?;

    let ai = state.ai.as_ref().ok_or_else(|| {
        AppError::bad_request("AI backend not configured. Set GEMINI_API_KEY environment variable.")
    })?;

    let outcome = ingest_receipt(
        &state.db,
        &state.storage,
        ai,
        &file_bytes,
        file_name.as_deref(),
        &mime_type,
    )
    .await
    .map_err(map_ingest_error)?;

    info!(
        expense_id = outcome.expense.id,
        category = %outcome.expense.category,
        "Receipt processed"
    );

    Ok(Json(ReceiptUploadResponse {
        message: "Receipt processed successfully".to_string(),
        data: outcome.expense,
    }))
}

/// Map pipeline errors to HTTP responses without leaking internals
fn map_ingest_error(err: Error) -> AppError {
    match err {
        Error::InvalidData(msg) => AppError::bad_request(&msg),
        Error::Duplicate(msg) => AppError::conflict(&msg),
        Error::Ai(_) | Error::Http(_) => {
            tracing::error!(error = %err, "AI extraction failed");
            AppError::internal("Failed to process receipt with AI")
        }
        Error::Storage(_) => {
            tracing::error!(error = %err, "Storage upload failed");
            AppError::internal("Failed to store receipt image")
        }
        other => {
            tracing::error!(error = %other, "Receipt processing failed");
            AppError::internal("Failed to process receipt")
        }
    }
}

/// GET / - Minimal upload form for manual testing
pub async fn upload_form() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Upload Receipt</title>
</head>
<body>
    <h1>Upload Receipt</h1>
    <form enctype="multipart/form-data" method="POST" action="/api/receipts">
        <input type="file" name="file" /><br/><br/>
        <input type="text" name="file_name" placeholder="Enter file name" /><br/><br/>
        <button type="submit">Upload</button>
    </form>
</body>
</html>
"#,
    )
}
