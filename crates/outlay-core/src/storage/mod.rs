//! Receipt image storage with pluggable backends
//!
//! Uploaded receipt bytes land in object storage before anything else
//! happens to them; the persisted expense only keeps the locator string.
//!
//! # Architecture
//!
//! - `StorageBackend` trait defines the interface for storage backends
//! - `GcsStore` uploads to Google Cloud Storage via the JSON API
//! - `LocalStore` writes to a local directory (default when GCS is not
//!   configured)
//!
//! Object keys are generated internally (`receipt_<timestamp>_<hash12><ext>`)
//! and never taken from user input, so they stay within a URL- and
//! filesystem-safe charset.

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{Error, Result};

mod gcs;
mod local;

pub use gcs::{GcsConfig, GcsStore};
pub use local::LocalStore;

/// Trait for receipt storage backends
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for this backend
    fn name(&self) -> &str;

    /// Store an object and return its locator string
    async fn store(&self, key: &str, data: &[u8], content_type: &str) -> Result<String>;

    /// Fetch an object's bytes
    async fn fetch(&self, key: &str) -> Result<Vec<u8>>;

    /// Delete an object
    async fn delete(&self, key: &str) -> Result<()>;

    /// Locator string for a key (e.g. "gs://bucket/key" or a file path)
    fn locator(&self, key: &str) -> String;
}

/// Concrete storage client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum StorageClient {
    /// Google Cloud Storage (JSON API)
    Gcs(GcsStore),
    /// Local directory
    Local(LocalStore),
}

impl StorageClient {
    /// Create a storage client from environment variables
    ///
    /// Checks `STORAGE_BACKEND` to determine which backend to use:
    /// - `gcs`: Uses GCS_BUCKET_NAME, GCS_ACCESS_TOKEN, GCS_ENDPOINT
    /// - `local`: Uses OUTLAY_RECEIPTS_DIR (or the platform data dir)
    ///
    /// When unset, picks GCS if fully configured and falls back to local.
    pub fn from_env() -> Result<Self> {
        match std::env::var("STORAGE_BACKEND").ok().as_deref() {
            Some("gcs") => Ok(StorageClient::Gcs(GcsStore::from_env()?)),
            Some("local") => Ok(StorageClient::Local(LocalStore::from_env())),
            Some(other) => Err(Error::Storage(format!(
                "Unknown STORAGE_BACKEND: {} (expected gcs or local)",
                other
            ))),
            None => {
                if GcsConfig::is_configured() {
                    Ok(StorageClient::Gcs(GcsStore::from_env()?))
                } else {
                    Ok(StorageClient::Local(LocalStore::from_env()))
                }
            }
        }
    }

    /// Create a local store rooted at the given directory
    pub fn local(dir: impl Into<std::path::PathBuf>) -> Self {
        StorageClient::Local(LocalStore::new(dir))
    }

    /// Verify the backend is usable (bucket reachable / directory writable)
    pub async fn verify_access(&self) -> Result<()> {
        match self {
            StorageClient::Gcs(s) => s.verify_access().await,
            StorageClient::Local(s) => s.verify_access(),
        }
    }
}

#[async_trait]
impl StorageBackend for StorageClient {
    fn name(&self) -> &str {
        match self {
            StorageClient::Gcs(s) => s.name(),
            StorageClient::Local(s) => s.name(),
        }
    }

    async fn store(&self, key: &str, data: &[u8], content_type: &str) -> Result<String> {
        match self {
            StorageClient::Gcs(s) => s.store(key, data, content_type).await,
            StorageClient::Local(s) => s.store(key, data, content_type).await,
        }
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        match self {
            StorageClient::Gcs(s) => s.fetch(key).await,
            StorageClient::Local(s) => s.fetch(key).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match self {
            StorageClient::Gcs(s) => s.delete(key).await,
            StorageClient::Local(s) => s.delete(key).await,
        }
    }

    fn locator(&self, key: &str) -> String {
        match self {
            StorageClient::Gcs(s) => s.locator(key),
            StorageClient::Local(s) => s.locator(key),
        }
    }
}

/// Generate an object key for an uploaded receipt
///
/// Combines a UTC timestamp with a content-hash prefix so two uploads in the
/// same second still get distinct keys.
pub fn object_key(content_hash: &str, mime_type: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let short_hash = &content_hash[..content_hash.len().min(12)];
    format!(
        "receipt_{}_{}{}",
        timestamp,
        short_hash,
        extension_for_mime(mime_type)
    )
}

/// File extension for a MIME type
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/png" => ".png",
        "image/webp" => ".webp",
        "image/gif" => ".gif",
        "application/pdf" => ".pdf",
        _ => ".bin",
    }
}

/// Reject keys that could escape the backend's namespace
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
        return Err(Error::Storage(format!("Invalid storage key: {}", key)));
    }
    Ok(())
}
