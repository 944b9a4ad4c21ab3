//! Shared application state
//!
//! One [`AppContext`] per process, handed to every handler as `Arc<AppContext>`.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;

use crate::accounts;
use crate::config::ServerConfig;
use crate::errors::{AppError, ValidationErrorExt};
use crate::extraction::ExtractionLimits;
use crate::processing::{LlmClient, TextEngine};
use crate::speech::SpeechService;
use crate::storage::{DocumentStore, StoredDocument, StoredUser};
use crate::validation;

pub struct AppContext {
    config: ServerConfig,
    pub store: DocumentStore,
    pub engine: TextEngine,
    pub speech: SpeechService,
    started_at: Instant,
}

impl AppContext {
    /// Open storage and wire up the processing services
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store = DocumentStore::open(&config.storage_path)?;

        let llm = LlmClient::from_config(&config.llm)
            .context("Failed to initialize language model client")?
            .map(Arc::new);
        if llm.is_none() {
            tracing::info!("No language model configured; all processing is rule-based");
        }

        let speech = SpeechService::new(
            llm.clone(),
            config.storage_path.join("audio"),
            &config.public_base_url,
        )?;

        Ok(Self {
            engine: TextEngine::new(llm),
            store,
            speech,
            config,
            started_at: Instant::now(),
        })
    }

    pub fn server_config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn extraction_limits(&self) -> ExtractionLimits {
        ExtractionLimits {
            max_file_size_bytes: self.config.max_file_size_bytes(),
            max_text_length: self.config.max_text_length,
            max_pdf_pages: self.config.max_pdf_pages,
        }
    }

    /// Validate the ID and load the document, or `DocumentNotFound`
    pub fn load_document(&self, id: &str) -> Result<StoredDocument, AppError> {
        validation::validate_id(id).map_validation_err("document_id")?;
        self.store
            .get_document(id)?
            .ok_or_else(|| AppError::DocumentNotFound(id.to_string()))
    }

    /// Resolve a bearer token to its account
    ///
    /// Unknown and expired tokens are `Unauthorized`; an expired session is
    /// removed on the way out.
    pub fn authenticate(&self, token: &str) -> Result<StoredUser, AppError> {
        let digest = accounts::token_digest(token);
        let session = self
            .store
            .get_session(&digest)?
            .ok_or_else(|| AppError::Unauthorized("invalid or expired token".to_string()))?;

        if session.is_expired(chrono::Utc::now()) {
            if let Err(e) = self.store.delete_session(&digest) {
                tracing::warn!("Failed to remove expired session: {:#}", e);
            }
            return Err(AppError::Unauthorized("invalid or expired token".to_string()));
        }

        self.store
            .get_user(&session.user_id)?
            .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))
    }

    /// Flush storage on shutdown
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }
}
