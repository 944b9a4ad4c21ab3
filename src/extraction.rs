//! Text extraction from uploaded PDF and plain-text files

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};
use crate::processing::sentences::{char_len, truncate_chars};

/// Preview length returned to clients after upload
pub const PREVIEW_CHARS: usize = 500;

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Txt,
}

impl FileKind {
    /// Detect the kind from a file name's extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "txt" => Ok(Self::Txt),
            "" => Err(AppError::UnsupportedFileType("(none)".to_string())),
            other => Err(AppError::UnsupportedFileType(format!(".{other}"))),
        }
    }

    /// Extension including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Txt => ".txt",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
        }
    }
}

/// Limits applied while validating an upload
#[derive(Debug, Clone, Copy)]
pub struct ExtractionLimits {
    pub max_file_size_bytes: usize,
    pub max_text_length: usize,
    pub max_pdf_pages: usize,
}

/// Validate an upload and extract its text
///
/// Checks run in order: extension, size, extraction, emptiness, text length.
pub fn extract_upload(filename: &str, bytes: &[u8], limits: ExtractionLimits) -> Result<(FileKind, String)> {
    let kind = FileKind::from_filename(filename)?;

    if bytes.len() > limits.max_file_size_bytes {
        return Err(AppError::FileTooLarge {
            size: bytes.len(),
            max: limits.max_file_size_bytes,
        });
    }

    let text = extract_text(kind, bytes, limits.max_pdf_pages)?;

    if text.trim().is_empty() {
        return Err(AppError::EmptyDocument);
    }

    let length = char_len(&text);
    if length > limits.max_text_length {
        return Err(AppError::TextTooLong {
            length,
            max: limits.max_text_length,
        });
    }

    Ok((kind, text))
}

/// Extract trimmed text from file bytes
pub fn extract_text(kind: FileKind, bytes: &[u8], max_pdf_pages: usize) -> Result<String> {
    match kind {
        FileKind::Pdf => extract_pdf(bytes, max_pdf_pages),
        FileKind::Txt => Ok(decode_text(bytes).trim().to_string()),
    }
}

fn extract_pdf(bytes: &[u8], max_pages: usize) -> Result<String> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| AppError::ExtractionFailed(format!("invalid PDF: {e}")))?;

    let pages = doc.get_pages().len();
    if pages > max_pages {
        return Err(AppError::TooManyPages {
            pages,
            max: max_pages,
        });
    }

    let text = catch_parser_panic(|| pdf_extract::extract_text_from_mem(bytes))?
        .map_err(|e| AppError::ExtractionFailed(e.to_string()))?;

    tracing::debug!(pages, chars = text.len(), "PDF text extracted");
    Ok(text.trim().to_string())
}

/// Run a PDF parser call, turning a panic inside it into `ExtractionFailed`
///
/// pdf-extract panics on some malformed fonts and streams.
fn catch_parser_panic<T>(f: impl FnOnce() -> T + std::panic::UnwindSafe) -> Result<T> {
    std::panic::catch_unwind(f).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown parser error".to_string());
        tracing::warn!("PDF parser panicked: {}", reason);
        AppError::ExtractionFailed(format!("unreadable PDF content: {reason}"))
    })
}

/// UTF-8, falling back to Latin-1 where every byte maps to U+0000..U+00FF
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.trim_start_matches('\u{feff}').to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// First 500 chars, with `...` when cut
pub fn preview(text: &str) -> String {
    if char_len(text) > PREVIEW_CHARS {
        format!("{}...", truncate_chars(text, PREVIEW_CHARS))
    } else {
        text.to_string()
    }
}
