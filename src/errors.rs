//! Structured error types with stable codes
//! Every error maps to an HTTP status and a machine-readable code for clients

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error response for API clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Application error types with proper categorization
#[derive(Debug)]
pub enum AppError {
    // Validation Errors (400)
    InvalidInput { field: String, reason: String },
    UnsupportedFileType(String),
    FileTooLarge { size: usize, max: usize },
    TextTooLong { length: usize, max: usize },
    TooManyPages { pages: usize, max: usize },
    EmptyDocument,
    ExtractionFailed(String),

    // Authentication (401)
    Unauthorized(String),

    // Conflict (409)
    EmailAlreadyRegistered(String),

    // Not Found Errors (404)
    DocumentNotFound(String),
    QuizNotFound(String),
    AudioNotFound(String),

    // Upstream model errors (502 / 503)
    LlmError(String),
    LlmUnavailable,

    // Internal Errors (500)
    StorageError(String),

    // Generic wrapper for external errors
    Internal(anyhow::Error),
}

impl AppError {
    /// Get error code for client identification
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::UnsupportedFileType(_) => "UNSUPPORTED_FILE_TYPE",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::TextTooLong { .. } => "TEXT_TOO_LONG",
            Self::TooManyPages { .. } => "TOO_MANY_PAGES",
            Self::EmptyDocument => "EMPTY_DOCUMENT",
            Self::ExtractionFailed(_) => "EXTRACTION_FAILED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::EmailAlreadyRegistered(_) => "EMAIL_ALREADY_REGISTERED",
            Self::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::QuizNotFound(_) => "QUIZ_NOT_FOUND",
            Self::AudioNotFound(_) => "AUDIO_NOT_FOUND",
            Self::LlmError(_) => "LLM_ERROR",
            Self::LlmUnavailable => "LLM_UNAVAILABLE",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. }
            | Self::UnsupportedFileType(_)
            | Self::FileTooLarge { .. }
            | Self::TextTooLong { .. }
            | Self::TooManyPages { .. }
            | Self::EmptyDocument
            | Self::ExtractionFailed(_) => StatusCode::BAD_REQUEST,

            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::EmailAlreadyRegistered(_) => StatusCode::CONFLICT,

            Self::DocumentNotFound(_) | Self::QuizNotFound(_) | Self::AudioNotFound(_) => {
                StatusCode::NOT_FOUND
            }

            Self::LlmError(_) => StatusCode::BAD_GATEWAY,
            Self::LlmUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            Self::StorageError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get detailed error message
    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput { field, reason } => {
                format!("Invalid input for field '{field}': {reason}")
            }
            Self::UnsupportedFileType(ext) => {
                format!("Unsupported file type '{ext}': only PDF and TXT files are supported")
            }
            Self::FileTooLarge { size, max } => {
                format!(
                    "File size ({:.2} MB) exceeds maximum allowed size ({} MB)",
                    *size as f64 / (1024.0 * 1024.0),
                    max / (1024 * 1024)
                )
            }
            Self::TextTooLong { length, max } => {
                format!(
                    "Extracted text ({length} characters) exceeds maximum allowed length ({max} characters)"
                )
            }
            Self::TooManyPages { pages, max } => {
                format!("PDF has {pages} pages. Maximum allowed is {max} pages.")
            }
            Self::EmptyDocument => "No text could be extracted from the file".to_string(),
            Self::ExtractionFailed(msg) => format!("Failed to extract text: {msg}"),
            Self::Unauthorized(msg) => format!("Unauthorized: {msg}"),
            Self::EmailAlreadyRegistered(email) => {
                format!("An account with email {email} already exists")
            }
            Self::DocumentNotFound(id) => format!("Document not found: {id}"),
            Self::QuizNotFound(id) => format!("Quiz not found: {id}"),
            Self::AudioNotFound(name) => format!("Audio file not found: {name}"),
            Self::LlmError(msg) => format!("Language model error: {msg}"),
            Self::LlmUnavailable => {
                "Language model is not configured. Set OPENAI_API_KEY to enable it.".to_string()
            }
            Self::StorageError(msg) => format!("Storage error: {msg}"),
            Self::Internal(err) => format!("Internal error: {err}"),
        }
    }

    /// Convert to structured error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.message(),
            details: None,
            request_id: None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<rocksdb::Error> for AppError {
    fn from(err: rocksdb::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self.message());
        }
        let body = self.to_response();

        (status, Json(body)).into_response()
    }
}

/// Helper trait to convert validation errors
pub trait ValidationErrorExt<T> {
    fn map_validation_err(self, field: &str) -> Result<T>;
}

impl<T> ValidationErrorExt<T> for anyhow::Result<T> {
    fn map_validation_err(self, field: &str) -> Result<T> {
        self.map_err(|e| AppError::InvalidInput {
            field: field.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
