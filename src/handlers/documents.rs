//! Document Handlers
//!
//! Upload, listing, retrieval, deletion, summarization and the combined
//! `/documents/process` pipeline.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Json,
};
use std::time::Instant;
use tokio::task::JoinError;
use tracing::{info, warn};

use super::router::AppState;
use super::users::CurrentUser;
use super::types::{
    DeleteResponse, DocumentInfo, DocumentListResponse, ProcessRequest, ProcessResponse,
    SummarizeRequest, SummarizeResponse, UploadResponse,
};
use crate::errors::{AppError, ValidationErrorExt};
use crate::extraction::{self, preview};
use crate::metrics::{DOCUMENTS_UPLOADED_TOTAL, UPLOAD_REJECTIONS_TOTAL};
use crate::processing::sentences::char_len;
use crate::processing::summarize::summarize as rule_based_summary;
use crate::processing::{AccessibilitySettings, ProcessingSource};
use crate::speech::prepare_narration;
use crate::storage::{StoredDocument, StoredSummary};
use crate::validation;

/// Summary length used by `/documents/process`
const PROCESS_SUMMARY_WORDS: usize = 200;

/// Map a multipart read failure; a body over the route limit is an oversized file
///
/// The exact file size is unknown once the body is cut off, so the request's
/// Content-Length stands in for it.
fn multipart_error(e: MultipartError, body_len: Option<usize>, max_file_size: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return rejected(
            "(streaming)",
            AppError::FileTooLarge {
                size: body_len.unwrap_or(max_file_size + 1),
                max: max_file_size,
            },
        );
    }
    AppError::InvalidInput {
        field: "file".to_string(),
        reason: e.body_text(),
    }
}

/// A failed extraction task; a panic inside the parser is treated as unreadable input
fn extraction_task_error(e: JoinError) -> AppError {
    if e.is_panic() {
        AppError::ExtractionFailed("document parser crashed on this file".to_string())
    } else {
        AppError::Internal(anyhow::anyhow!("extraction task failed: {e}"))
    }
}

/// Count and log an upload rejection
fn rejected(filename: &str, e: AppError) -> AppError {
    UPLOAD_REJECTIONS_TOTAL.with_label_values(&[e.code()]).inc();
    warn!(filename = %filename, code = e.code(), "Upload rejected: {}", e.message());
    e
}

fn document_info(doc: &StoredDocument) -> DocumentInfo {
    DocumentInfo {
        document_id: doc.id.clone(),
        filename: doc.filename.clone(),
        file_type: doc.file_type,
        file_size: doc.file_size,
        text_length: doc.text_length,
        uploaded_at: doc.uploaded_at,
        text_preview: preview(&doc.extracted_text),
        user_id: doc.owner_id.clone(),
    }
}

// =============================================================================
// UPLOAD
// =============================================================================

/// POST /documents/upload - multipart form with a `file` field
///
/// A login token, when present, records the uploading account.
pub async fn upload(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let start = Instant::now();

    let limits = state.extraction_limits();
    let body_len = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    let read_error =
        |e: MultipartError| multipart_error(e, body_len, limits.max_file_size_bytes);

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("document").to_string();
            let data = field.bytes().await.map_err(read_error)?;
            upload = Some((filename, data));
        }
    }
    let (filename, data) = upload.ok_or_else(|| AppError::InvalidInput {
        field: "file".to_string(),
        reason: "multipart field 'file' is required".to_string(),
    })?;

    let extracted = {
        let filename = filename.clone();
        let data = data.clone();
        tokio::task::spawn_blocking(move || extraction::extract_upload(&filename, &data, limits))
            .await
            .map_err(extraction_task_error)
            .and_then(|r| r)
    };
    let (kind, text) = extracted.map_err(|e| rejected(&filename, e))?;

    let id = uuid::Uuid::new_v4().to_string();
    let filepath = state.store.save_upload_file(&id, kind, &data)?;
    let doc = StoredDocument {
        id: id.clone(),
        filename,
        file_type: kind,
        file_size: data.len(),
        filepath,
        text_length: char_len(&text),
        extracted_text: text,
        uploaded_at: chrono::Utc::now(),
        owner_id: user.map(|u| u.user.id),
    };
    state.store.put_document(&doc)?;
    DOCUMENTS_UPLOADED_TOTAL
        .with_label_values(&[kind.as_str()])
        .inc();

    info!(
        document_id = %id,
        file_type = kind.as_str(),
        chars = doc.text_length,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Document uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            text_preview: preview(&doc.extracted_text),
            document_id: doc.id,
            filename: doc.filename,
            file_type: doc.file_type,
            file_size: doc.file_size,
            uploaded_at: doc.uploaded_at,
            user_id: doc.owner_id,
        }),
    ))
}

// =============================================================================
// CRUD
// =============================================================================

/// GET /documents - metadata for every stored document, or only the caller's
/// own when a login token is sent
pub async fn list_documents(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let stored = match &user {
        Some(current) => state.store.list_documents_owned_by(&current.user.id)?,
        None => state.store.list_documents()?,
    };
    let documents: Vec<DocumentInfo> = stored.iter().map(document_info).collect();

    Ok(Json(DocumentListResponse {
        total: documents.len(),
        documents,
    }))
}

/// GET /documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentInfo>, AppError> {
    let doc = state.load_document(&id)?;
    Ok(Json(document_info(&doc)))
}

/// DELETE /documents/{id} - removes the document, its summary, quizzes and file
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    validation::validate_id(&id).map_validation_err("document_id")?;

    if !state.store.delete_document(&id)? {
        return Err(AppError::DocumentNotFound(id));
    }
    info!(document_id = %id, "Document deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Document {id} deleted"),
    }))
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Cached summary when the parameters match, otherwise a fresh one
///
/// With a model configured only model output is cached, so a fallback
/// produced during an outage is not served after the model recovers. A failed
/// cache write is logged and does not fail the request.
async fn summary_for(
    state: &AppState,
    doc: &StoredDocument,
    max_words: usize,
    focus: Option<&str>,
) -> Result<StoredSummary, AppError> {
    if let Some(cached) = state.store.get_summary(&doc.id)? {
        if cached.matches(max_words, focus) {
            tracing::debug!(document_id = %doc.id, "Summary cache hit");
            return Ok(cached);
        }
    }

    let processed = state
        .engine
        .summarize(&doc.extracted_text, max_words, focus)
        .await;
    let summary = StoredSummary {
        document_id: doc.id.clone(),
        summary: processed.value,
        max_length: max_words,
        focus: focus.map(str::to_string),
        source: processed.source,
        created_at: chrono::Utc::now(),
    };
    let cacheable = summary.source == ProcessingSource::Llm || !state.engine.has_llm();
    if cacheable {
        if let Err(e) = state.store.put_summary(&summary) {
            warn!(document_id = %doc.id, "Failed to cache summary: {:#}", e);
        }
    }
    Ok(summary)
}

/// POST /documents/summarize
pub async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError> {
    let start = Instant::now();

    validation::validate_summary_length(req.max_length).map_validation_err("max_length")?;
    let cap = state.server_config().max_summary_words;
    if req.max_length > cap {
        return Err(AppError::InvalidInput {
            field: "max_length".to_string(),
            reason: format!("{} words exceeds the configured limit of {cap}", req.max_length),
        });
    }
    let focus = req.focus.as_deref().map(str::trim).filter(|f| !f.is_empty());
    validation::validate_focus(focus).map_validation_err("focus")?;

    let doc = state.load_document(&req.document_id)?;
    let summary = summary_for(&state, &doc, req.max_length, focus).await?;

    info!(
        document_id = %doc.id,
        source = summary.source.as_str(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Summary ready"
    );

    Ok(Json(SummarizeResponse {
        document_id: doc.id,
        original_length: doc.text_length,
        summary_length: char_len(&summary.summary),
        summary: summary.summary,
        source: summary.source,
        created_at: summary.created_at,
    }))
}

// =============================================================================
// PROCESS
// =============================================================================

/// POST /documents/process - run the requested operations on one document
///
/// Options are independent. Summary and simplification always produce a
/// result; a failed narration yields `audio_url: null`.
pub async fn process(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, AppError> {
    let start = Instant::now();

    let settings = req
        .accessibility_settings
        .as_ref()
        .map(AccessibilitySettings::from_map)
        .transpose()
        .map_validation_err("accessibility_settings")?;
    let doc = state.load_document(&req.document_id)?;
    let text = doc.extracted_text.as_str();
    let options = &req.options;

    let summary_words = PROCESS_SUMMARY_WORDS.min(state.server_config().max_summary_words);
    let summary_task = async {
        if !options.summary {
            return None;
        }
        match summary_for(&state, &doc, summary_words, None).await {
            Ok(summary) => Some(summary.summary),
            Err(e) => {
                warn!(document_id = %doc.id, "Summary lookup failed, using rule-based: {}", e);
                Some(rule_based_summary(text, summary_words, None))
            }
        }
    };

    let simplify_task = async {
        if options.simplify {
            Some(state.engine.simplify(text).await.value)
        } else {
            None
        }
    };

    let audio_task = async {
        if !options.text_to_audio {
            return None;
        }
        let narration = prepare_narration(text);
        match state.speech.synthesize(&narration, "en", false, None).await {
            Ok(audio) => Some(audio.audio_url),
            Err(e) => {
                warn!(document_id = %doc.id, code = e.code(), "Narration failed: {}", e.message());
                None
            }
        }
    };

    let (summary, simplified_text, audio_url) =
        tokio::join!(summary_task, simplify_task, audio_task);

    let highlighted_text = options.highlight.then(|| state.engine.highlight(text));

    let processed_text = simplified_text
        .as_deref()
        .or(highlighted_text.as_deref())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(text)
        .to_string();

    let accessibility_applied = settings.map(|s| s.to_map()).unwrap_or_default();

    info!(
        document_id = %doc.id,
        summary = summary.is_some(),
        highlight = highlighted_text.is_some(),
        audio = audio_url.is_some(),
        simplify = simplified_text.is_some(),
        source = if state.engine.has_llm() {
            ProcessingSource::Llm.as_str()
        } else {
            ProcessingSource::RuleBased.as_str()
        },
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Document processed"
    );

    Ok(Json(ProcessResponse {
        document_id: doc.id.clone(),
        processed_text,
        summary,
        highlighted_text,
        audio_url,
        simplified_text,
        accessibility_applied,
    }))
}
