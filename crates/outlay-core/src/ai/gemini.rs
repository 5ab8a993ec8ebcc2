//! Gemini backend implementation
//!
//! HTTP client for the Google Generative Language API (`generateContent`).
//! The receipt image travels as base64 inline data next to the extraction
//! prompt; the reply comes back as free text for the extraction parser.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::AiBackend;

/// Default generateContent endpoint host
const DEFAULT_HOST: &str = "https://generativelanguage.googleapis.com";

/// Default extraction model
const DEFAULT_MODEL: &str = "gemini-1.5-flash-002";

/// Minimum plausible API key length; anything shorter is a config mistake
pub const MIN_API_KEY_LEN: usize = 8;

/// Prompt sent alongside every receipt image
///
/// The reply format must stay line-oriented `field: value` pairs, since the
/// extraction parser scans for exactly those labels.
const EXTRACTION_PROMPT: &str = "Extract the key details from this receipt image. \
Reply in plain text with exactly three lines, formatted as \
'description: ...', 'date: ...' and 'amount: ...'. \
Fold any additional detail into the description line, do not use markdown \
or bold text, and leave out any field that is not present on the receipt.";

/// Mask an API key for logging: first and last four characters only
///
/// Keys shorter than the minimum are fully masked.
pub fn mask_api_key(key: &str) -> String {
    if key.len() < MIN_API_KEY_LEN {
        return "****".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}

/// Gemini backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create from environment variables
    ///
    /// Returns None when `GEMINI_API_KEY` is not set. Keys shorter than
    /// [`MIN_API_KEY_LEN`] are rejected here rather than failing on the
    /// first API call.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        if api_key.len() < MIN_API_KEY_LEN {
            tracing::warn!("GEMINI_API_KEY is too short, ignoring");
            return None;
        }
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let host = std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        Some(Self::new(&host, &model, &api_key))
    }

    /// Masked form of the configured key, safe for logs
    pub fn masked_key(&self) -> String {
        mask_api_key(&self.api_key)
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

/// Request to the generateContent API
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Response from the generateContent API
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    ///
    /// An empty candidate list yields the literal "No output generated",
    /// which the extraction parser turns into the all-defaults record.
    fn reply_text(self) -> String {
        let text = self
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            "No output generated".to_string()
        } else {
            text
        }
    }
}

#[async_trait]
impl AiBackend for GeminiBackend {
    async fn extract_receipt(&self, image_data: &[u8], mime_type: &str) -> Result<String> {
        let base64_image = base64::engine::general_purpose::STANDARD.encode(image_data);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text(EXTRACTION_PROMPT.to_string()),
                    Part::InlineData(InlineData {
                        mime_type: mime_type.to_string(),
                        data: base64_image,
                    }),
                ],
            }],
        };

        let response = self
            .http_client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let generate_response: GenerateContentResponse = response.json().await?;
        let reply = generate_response.reply_text();
        debug!(model = %self.model, "Gemini reply: {}", reply);

        Ok(reply)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1beta/models?key={}", self.base_url, self.api_key);
        match self.http_client.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
