//! Study assistant chat

use axum::{extract::State, response::Json};
use std::time::Instant;

use super::router::AppState;
use super::types::{ChatRequest, ChatResponse};
use crate::errors::{AppError, ValidationErrorExt};
use crate::validation;

/// POST /chatbot/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let start = Instant::now();
    validation::validate_chat_message(&req.message).map_validation_err("message")?;

    let reply = state
        .engine
        .chat(req.message.trim(), &req.conversation_history)
        .await;

    tracing::info!(
        source = reply.source.as_str(),
        turns = reply.value.history.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Chat reply"
    );

    Ok(Json(ChatResponse {
        response: reply.value.response,
        conversation_history: reply.value.history,
        source: reply.source,
    }))
}
