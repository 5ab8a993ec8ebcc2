//! Google Cloud Storage backend
//!
//! Talks to the GCS JSON API directly over reqwest: media upload for
//! storing receipt images, `alt=media` download for fetching them back.
//! Locators use the `gs://bucket/key` form.
//!
//! # Configuration
//!
//! The following environment variables are required:
//! - `GCS_BUCKET_NAME` - bucket name
//! - `GCS_ACCESS_TOKEN` - OAuth2 bearer token
//! - `GCS_ENDPOINT` - API endpoint override, optional (emulators/tests;
//!   defaults to https://storage.googleapis.com)

use async_trait::async_trait;
use reqwest::Client;

use super::{validate_key, StorageBackend};
use crate::error::{Error, Result};

/// Environment variable names for GCS configuration
pub const GCS_BUCKET_ENV: &str = "GCS_BUCKET_NAME";
pub const GCS_TOKEN_ENV: &str = "GCS_ACCESS_TOKEN";
pub const GCS_ENDPOINT_ENV: &str = "GCS_ENDPOINT";

/// Default GCS API endpoint
const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// GCS configuration
#[derive(Debug, Clone)]
pub struct GcsConfig {
    pub bucket: String,
    pub access_token: String,
    pub endpoint: String,
}

impl GcsConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let bucket = std::env::var(GCS_BUCKET_ENV).map_err(|_| {
            Error::Storage(format!("{} environment variable not set", GCS_BUCKET_ENV))
        })?;

        let access_token = std::env::var(GCS_TOKEN_ENV).map_err(|_| {
            Error::Storage(format!("{} environment variable not set", GCS_TOKEN_ENV))
        })?;

        let endpoint =
            std::env::var(GCS_ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            bucket,
            access_token,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Check if GCS is configured (all required env vars are set)
    pub fn is_configured() -> bool {
        std::env::var(GCS_BUCKET_ENV).is_ok() && std::env::var(GCS_TOKEN_ENV).is_ok()
    }
}

/// Google Cloud Storage backend
#[derive(Clone)]
pub struct GcsStore {
    http_client: Client,
    config: GcsConfig,
}

impl GcsStore {
    /// Create a new GCS store
    pub fn new(config: GcsConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(GcsConfig::from_env()?))
    }

    /// Bucket this store writes to
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    /// Probe bucket metadata to confirm the token has access
    pub async fn verify_access(&self) -> Result<()> {
        let url = format!(
            "{}/storage/v1/b/{}",
            self.config.endpoint, self.config.bucket
        );
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "Insufficient permissions for bucket {}: HTTP {}",
                self.config.bucket,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for GcsStore {
    fn name(&self) -> &str {
        "gcs"
    }

    async fn store(&self, key: &str, data: &[u8], content_type: &str) -> Result<String> {
        validate_key(key)?;

        let url = format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.config.endpoint, self.config.bucket, key
        );

        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "Upload of {} to bucket {} failed: HTTP {}",
                key,
                self.config.bucket,
                response.status()
            )));
        }

        tracing::info!(bucket = %self.config.bucket, key = %key, "Uploaded receipt to GCS");
        Ok(self.locator(key))
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        validate_key(key)?;

        let url = format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.config.endpoint, self.config.bucket, key
        );

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("Object not found: {}", key)));
        }
        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "Download of {} failed: HTTP {}",
                key,
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;

        let url = format!(
            "{}/storage/v1/b/{}/o/{}",
            self.config.endpoint, self.config.bucket, key
        );

        let response = self
            .http_client
            .delete(url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "Delete of {} failed: HTTP {}",
                key,
                response.status()
            )));
        }
        Ok(())
    }

    fn locator(&self, key: &str) -> String {
        format!("gs://{}/{}", self.config.bucket, key)
    }
}
