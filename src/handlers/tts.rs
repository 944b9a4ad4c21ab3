//! Text-to-Speech Handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::router::AppState;
use super::types::{DeleteResponse, TtsRequest, TtsResponse};
use crate::errors::{AppError, ValidationErrorExt};
use crate::validation;

/// POST /tts/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<TtsRequest>,
) -> Result<Json<TtsResponse>, AppError> {
    validation::validate_tts_text(&req.text).map_validation_err("text")?;

    let result = state
        .speech
        .synthesize(
            req.text.trim(),
            &req.language,
            req.slow,
            req.voice_type.as_deref(),
        )
        .await?;

    Ok(Json(TtsResponse {
        audio_url: result.audio_url,
        text: result.text,
        language: result.language,
        duration_seconds: result.duration_seconds,
    }))
}

/// GET /tts/audio/{filename} - MP3 bytes
pub async fn get_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_audio_filename(&filename).map_validation_err("filename")?;
    let bytes = state.speech.read_audio(&filename).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], bytes))
}

/// DELETE /tts/audio/{filename}
pub async fn delete_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    validation::validate_audio_filename(&filename).map_validation_err("filename")?;
    state.speech.delete_audio(&filename).await?;
    info!(file = %filename, "Audio deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Audio file {filename} deleted"),
    }))
}
