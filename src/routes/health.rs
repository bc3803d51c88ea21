/**
 * Health Routes
 * Endpoints for checking backend health status
 */
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::state::AppState;

// Track server start time for uptime calculation
lazy_static::lazy_static! {
    static ref SERVER_START: Instant = Instant::now();
}

/// Initialize the server start time
pub fn init_start_time() {
    lazy_static::initialize(&SERVER_START);
}

/// Simple health response
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleHealthResponse {
    pub status: String,
}

/// Ready check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime: u64,
    pub checks: ReadyChecks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Ready checks summary
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyChecks {
    pub content: String,
}

/// GET /health - Simple health ping
pub async fn health_ping() -> impl IntoResponse {
    Json(SimpleHealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /health/ready - Readiness check
///
/// Ready once the post content directory exists.
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = SERVER_START.elapsed().as_secs();

    let content_ok = tokio::fs::metadata(state.content_dir.as_ref())
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    if !content_ok {
        tracing::warn!(
            content_dir = %state.content_dir.display(),
            "readiness check: content directory missing"
        );
    }

    let response = ReadyResponse {
        status: if content_ok { "ready" } else { "not ready" }.to_string(),
        timestamp: Utc::now(),
        uptime,
        checks: ReadyChecks {
            content: if content_ok { "healthy" } else { "unhealthy" }.to_string(),
        },
        reason: (!content_ok).then(|| "Post content directory not found".to_string()),
    };

    (StatusCode::OK, Json(response))
}
