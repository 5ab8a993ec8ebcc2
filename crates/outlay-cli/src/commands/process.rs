//! One-shot receipt processing command

use std::path::Path;

use anyhow::{bail, Context, Result};
use outlay_core::ai::AiClient;
use outlay_core::ingest::ingest_receipt;
use outlay_core::storage::StorageClient;

use super::open_db;

/// Guess a MIME type from the file extension
pub(crate) fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

pub async fn cmd_process(db_path: &Path, file: &Path, name: Option<&str>) -> Result<()> {
    println!("🧾 Processing receipt {}...", file.display());

    let data = std::fs::read(file)
        .with_context(|| format!("Failed to read receipt file {}", file.display()))?;
    let mime_type = mime_for_path(file);

    let Some(ai) = AiClient::from_env() else {
        bail!(
            "No AI backend configured. Set GEMINI_API_KEY, \
             or AI_BACKEND=mock for development."
        );
    };

    let db = open_db(db_path)?;
    let storage = StorageClient::from_env()?;
    storage.verify_access().await?;

    let file_name = name.or_else(|| file.file_name().and_then(|n| n.to_str()));
    let outcome = ingest_receipt(&db, &storage, &ai, &data, file_name, mime_type).await?;

    println!();
    println!("📋 Extraction");
    println!("   ─────────────────────────────");
    println!("   Description: {}", outcome.extracted.description);
    println!("   Date:        {}", outcome.extracted.date);
    println!("   Amount:      {:.2}", outcome.extracted.amount);
    println!();
    println!("✅ Saved expense #{}", outcome.expense.id);
    println!("   Category: {}", outcome.expense.category);
    println!("   Image:    {}", outcome.expense.image_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(&PathBuf::from("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(&PathBuf::from("a.png")), "image/png");
        assert_eq!(mime_for_path(&PathBuf::from("scan.pdf")), "application/pdf");
        assert_eq!(mime_for_path(&PathBuf::from("noext")), "application/octet-stream");
    }
}
