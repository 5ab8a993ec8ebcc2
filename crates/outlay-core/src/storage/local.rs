//! Local directory storage backend
//!
//! Writes receipt images to a directory on disk. This is the default
//! backend when GCS is not configured, and what the test suite uses.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{validate_key, StorageBackend};
use crate::error::{Error, Result};

/// Environment variable overriding the receipts directory
pub const RECEIPTS_DIR_ENV: &str = "OUTLAY_RECEIPTS_DIR";

/// Default receipts directory under the platform data dir
pub fn default_receipts_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("outlay")
        .join("receipts")
}

/// Local filesystem backend
#[derive(Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create from environment, falling back to the platform data dir
    pub fn from_env() -> Self {
        let dir = std::env::var(RECEIPTS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_receipts_dir());
        Self::new(dir)
    }

    /// Directory this store writes to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensure the directory exists and is writable
    pub fn verify_access(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Storage(format!(
                "Cannot create receipts directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl StorageBackend for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn store(&self, key: &str, data: &[u8], _content_type: &str) -> Result<String> {
        validate_key(key)?;
        self.verify_access()?;

        let path = self.path_for(key);
        std::fs::write(&path, data)?;

        tracing::info!(path = %path.display(), "Stored receipt locally");
        Ok(self.locator(key))
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        validate_key(key)?;

        let path = self.path_for(key);
        if !path.exists() {
            return Err(Error::NotFound(format!("Object not found: {}", key)));
        }
        Ok(std::fs::read(path)?)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        std::fs::remove_file(self.path_for(key))?;
        Ok(())
    }

    fn locator(&self, key: &str) -> String {
        self.path_for(key).to_string_lossy().to_string()
    }
}
