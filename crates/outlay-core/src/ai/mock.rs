//! Mock backend for testing
//!
//! Returns a canned extraction reply without any network access. Useful for
//! unit tests and development without a Gemini API key.

use async_trait::async_trait;

use crate::error::Result;

use super::AiBackend;

/// Default canned reply, shaped like a real model response
const DEFAULT_REPLY: &str =
    "description: lunch at the corner restaurant\ndate: 2024-01-15\namount: 18.40";

/// Mock AI backend for testing
///
/// Returns a predictable reply for every extraction. Can be configured with
/// a custom reply for specific tests.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: String,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: DEFAULT_REPLY.to_string(),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            reply: DEFAULT_REPLY.to_string(),
        }
    }

    /// Create a mock backend that returns the given reply text
    pub fn with_reply(reply: &str) -> Self {
        Self {
            healthy: true,
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl AiBackend for MockBackend {
    async fn extract_receipt(&self, _image_data: &[u8], _mime_type: &str) -> Result<String> {
        Ok(self.reply.clone())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_reply() {
        let backend = MockBackend::new();
        let reply = backend.extract_receipt(b"image", "image/jpeg").await.unwrap();
        assert!(reply.contains("description:"));
        assert!(reply.contains("amount:"));
    }

    #[tokio::test]
    async fn test_mock_custom_reply() {
        let backend = MockBackend::with_reply("description: cab to airport\namount: 32.00");
        let reply = backend.extract_receipt(b"image", "image/jpeg").await.unwrap();
        assert_eq!(reply, "description: cab to airport\namount: 32.00");
    }

    #[tokio::test]
    async fn test_mock_unhealthy() {
        let backend = MockBackend::unhealthy();
        assert!(!backend.health_check().await);
    }
}
