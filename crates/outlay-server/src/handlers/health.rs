//! Health probe handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use outlay_core::ai::AiBackend;
use outlay_core::storage::StorageBackend;

/// Health probe response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether an AI backend is configured at all
    pub ai_configured: bool,
    /// Whether the configured AI backend answered its health check
    pub ai_healthy: bool,
    /// Name of the active storage backend
    pub storage: String,
}

/// GET /api/health - Service health and backend status
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ai_healthy = match &state.ai {
        Some(client) => client.health_check().await,
        None => false,
    };

    Json(HealthResponse {
        status: "ok",
        ai_configured: state.ai.is_some(),
        ai_healthy,
        storage: state.storage.name().to_string(),
    })
}
