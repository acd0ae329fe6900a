//! AI backend health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use spendwise_core::AIBackend;

/// AI backend status
#[derive(Debug, Serialize)]
pub struct AiHealthStatus {
    pub configured: bool,
    pub healthy: bool,
    pub backend: Option<String>,
    pub host: Option<String>,
    pub model: Option<String>,
}

/// GET /api/ai/health - Live health check of the configured backend
pub async fn ai_health(State(state): State<Arc<AppState>>) -> Json<AiHealthStatus> {
    let status = match state.suggester.as_ref().map(|s| s.backend()) {
        Some(client) => AiHealthStatus {
            configured: true,
            healthy: client.health_check().await,
            backend: Some(client.kind().to_string()),
            host: Some(client.host().to_string()),
            model: Some(client.model().to_string()),
        },
        None => AiHealthStatus {
            configured: false,
            healthy: false,
            backend: None,
            host: None,
            model: None,
        },
    };

    Json(status)
}
