//! Router Configuration - Centralized route definitions
//!
//! Routes are split into public (health, metrics, accounts) and protected
//! (the document API). The caller decides whether the protected half gets the auth layer.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::state::AppContext;
use super::{chatbot, documents, health, quiz, tts, users};

/// Application state type alias
pub type AppState = Arc<AppContext>;

/// Multipart framing overhead allowed on top of the file size limit
const UPLOAD_BODY_SLACK: usize = 1024 * 1024;

/// Build the public routes (no API key required)
pub fn build_public_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        // =================================================================
        // HEALTH & KUBERNETES CHECKS
        // =================================================================
        .route("/health", get(health::health))
        .route("/health/live", get(health::health_live))
        .route("/health/ready", get(health::health_ready))
        // =================================================================
        // METRICS (PROMETHEUS)
        // =================================================================
        .route("/metrics", get(health::metrics_endpoint))
        // =================================================================
        // ACCOUNTS (bearer token checked per handler)
        // =================================================================
        .route("/auth/signup", post(users::signup))
        .route("/auth/login", post(users::login))
        .route("/auth/logout", post(users::logout))
        .route("/auth/me", get(users::me))
        .with_state(state)
}

/// Build the protected API routes
///
/// The auth middleware is applied by the caller when enabled.
pub fn build_protected_routes(state: AppState) -> Router {
    let upload_limit = state.server_config().max_file_size_bytes() + UPLOAD_BODY_SLACK;

    Router::new()
        // =================================================================
        // DOCUMENTS
        // =================================================================
        .route(
            "/documents/upload",
            post(documents::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/documents", get(documents::list_documents))
        .route(
            "/documents/{id}",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route("/documents/summarize", post(documents::summarize))
        .route("/documents/process", post(documents::process))
        // =================================================================
        // QUIZ
        // =================================================================
        .route("/quiz/generate", post(quiz::generate))
        .route("/quiz/{quiz_id}", get(quiz::get_quiz))
        // =================================================================
        // TEXT TO SPEECH
        // =================================================================
        .route("/tts/generate", post(tts::generate))
        .route(
            "/tts/audio/{filename}",
            get(tts::get_audio).delete(tts::delete_audio),
        )
        // =================================================================
        // CHATBOT
        // =================================================================
        .route("/chatbot/chat", post(chatbot::chat))
        .with_state(state)
}

/// Build the complete router without auth or global layers
pub fn build_router(state: AppState) -> Router {
    let public = build_public_routes(state.clone());
    let protected = build_protected_routes(state);

    Router::new().merge(public).merge(protected)
}
