//! Test utilities for outlay-core
//!
//! This module provides testing infrastructure including a mock Gemini
//! server that can be used for development and integration tests.

use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Reply the mock server returns for every extraction request
pub const MOCK_REPLY: &str = "description: flight to denver\ndate: 2024-02-10\namount: 412.60";

/// Mock Gemini server for testing and development
pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/v1beta/models", get(handle_models))
            .route("/v1beta/models/:model", post(handle_generate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Models list endpoint (health check)
async fn handle_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: vec![ModelInfo {
            name: "models/gemini-1.5-flash-002".to_string(),
        }],
    })
}

/// generateContent endpoint
///
/// The `:model` path segment arrives as "gemini-1.5-flash-002:generateContent";
/// the action suffix is ignored. Replies with a canned extraction whenever the
/// request carries inline image data, and an empty candidate list otherwise.
async fn handle_generate(
    axum::extract::Path(_model): axum::extract::Path<String>,
    Json(request): Json<GenerateRequest>,
) -> Json<GenerateResponse> {
    let has_image = request
        .contents
        .iter()
        .flat_map(|c| c.parts.iter())
        .any(|p| p.inline_data.is_some());

    let candidates = if has_image {
        vec![Candidate {
            content: CandidateContent {
                parts: vec![CandidatePart {
                    text: MOCK_REPLY.to_string(),
                }],
            },
        }]
    } else {
        vec![]
    };

    Json(GenerateResponse { candidates })
}

// Request/Response types for the mock server

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Deserialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Deserialize)]
struct RequestPart {
    #[allow(dead_code)]
    text: Option<String>,
    inline_data: Option<RequestInlineData>,
}

#[derive(Debug, Deserialize)]
struct RequestInlineData {
    #[allow(dead_code)]
    mime_type: String,
    #[allow(dead_code)]
    data: String,
}

#[derive(Debug, Serialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Serialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Serialize)]
struct CandidatePart {
    text: String,
}
