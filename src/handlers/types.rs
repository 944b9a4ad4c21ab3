//! Request and response bodies for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::extraction::FileKind;
use crate::processing::{ChatMessage, Difficulty, ProcessingSource, QuestionTypes, QuizQuestion};

// =============================================================================
// DOCUMENTS
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub document_id: String,
    pub filename: String,
    pub file_type: FileKind,
    pub file_size: usize,
    pub uploaded_at: DateTime<Utc>,
    pub text_preview: String,
    /// Uploading account when the request carried a login token
    pub user_id: Option<String>,
}

/// Document metadata without the full text
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub document_id: String,
    pub filename: String,
    pub file_type: FileKind,
    pub file_size: usize,
    pub text_length: usize,
    pub uploaded_at: DateTime<Utc>,
    pub text_preview: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentInfo>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

fn default_max_length() -> usize {
    200
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub document_id: String,
    /// Summary length in words (50-500)
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    pub focus: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub document_id: String,
    pub summary: String,
    pub original_length: usize,
    pub summary_length: usize,
    pub source: ProcessingSource,
    pub created_at: DateTime<Utc>,
}

/// Operations requested from `/documents/process`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    pub summary: bool,
    pub highlight: bool,
    #[serde(rename = "textToAudio", alias = "text_to_audio")]
    pub text_to_audio: bool,
    pub simplify: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub document_id: String,
    #[serde(default)]
    pub options: ProcessOptions,
    #[serde(default)]
    pub accessibility_settings: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub document_id: String,
    pub processed_text: String,
    pub summary: Option<String>,
    pub highlighted_text: Option<String>,
    pub audio_url: Option<String>,
    pub simplified_text: Option<String>,
    pub accessibility_applied: BTreeMap<String, String>,
}

// =============================================================================
// QUIZ
// =============================================================================

fn default_num_questions() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub document_id: String,
    pub question_types: QuestionTypes,
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub document_id: String,
    pub quiz_id: String,
    pub questions: Vec<QuizQuestion>,
    pub total_questions: usize,
    pub difficulty: Difficulty,
    pub source: ProcessingSource,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// TEXT TO SPEECH
// =============================================================================

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub slow: bool,
    pub voice_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TtsResponse {
    pub audio_url: String,
    pub text: String,
    pub language: String,
    pub duration_seconds: f64,
}

// =============================================================================
// CHATBOT
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_history: Vec<ChatMessage>,
    pub source: ProcessingSource,
}

// =============================================================================
// ACCOUNTS
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account; never includes the password hash
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}
