//! Health and Infrastructure Handlers
//!
//! Banner, Kubernetes health checks and the Prometheus scrape endpoint.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use super::router::AppState;
use crate::metrics;

/// Health response for the main health endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub documents_stored: usize,
    pub llm_configured: bool,
    pub tts_available: bool,
    pub uptime_secs: u64,
}

/// Root banner
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "EduNeuro API - AI-powered learning support for dyslexia and ADHD",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Main health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documents_stored: state.store.count(),
        llm_configured: state.engine.has_llm(),
        tts_available: state.speech.is_available(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Liveness check: the process is up and serving
pub async fn health_live() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// Readiness check
///
/// Rule-based processing needs no external service, so readiness only
/// depends on storage being open.
pub async fn health_ready(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ready",
            "version": env!("CARGO_PKG_VERSION"),
            "documents_stored": state.store.count(),
            "llm_configured": state.engine.has_llm(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// Prometheus metrics endpoint
pub async fn metrics_endpoint() -> Result<String, StatusCode> {
    metrics::gather_text().map_err(|e| {
        tracing::error!("Failed to encode metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_root_banner() {
        let h = TestHarness::new();
        let (status, body) = send(h.router(), get_unauthenticated("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("EduNeuro"));
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_health_reports_rule_based_mode() {
        let h = TestHarness::new();
        let (status, body) = send(h.router(), get_unauthenticated("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["documents_stored"], 0);
        assert_eq!(body["llm_configured"], false);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let h = TestHarness::new();
        let (status, body) = send(h.router(), get_unauthenticated("/health/live")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "alive");

        let (status, body) = send(h.router(), get_unauthenticated("/health/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }
}
