//! Persistent document store
//!
//! RocksDB holds document records, cached summaries and quizzes, encoded with
//! bincode. Uploaded file bytes live next to it under `documents/`.
//!
//! Key layout:
//! - `doc:{document_id}` → [`StoredDocument`]
//! - `summary:{document_id}` → [`StoredSummary`]
//! - `quiz:{quiz_id}` → [`StoredQuiz`]
//! - `docquiz:{document_id}:{quiz_id}` → empty (index for cascading deletes)
//! - `user:{user_id}` → [`StoredUser`]
//! - `email:{lowercased email}` → user ID
//! - `session:{token digest}` → [`StoredSession`]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rocksdb::{Options, WriteBatch, DB};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::extraction::FileKind;
use crate::metrics::DOCUMENTS_STORED;
use crate::processing::{Difficulty, ProcessingSource, QuizQuestion};

const DOC_PREFIX: &str = "doc:";
const SUMMARY_PREFIX: &str = "summary:";
const QUIZ_PREFIX: &str = "quiz:";
const DOC_QUIZ_PREFIX: &str = "docquiz:";
const USER_PREFIX: &str = "user:";
const EMAIL_PREFIX: &str = "email:";
const SESSION_PREFIX: &str = "session:";

/// An uploaded document and its extracted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub filename: String,
    pub file_type: FileKind,
    pub file_size: usize,
    pub filepath: PathBuf,
    pub extracted_text: String,
    pub text_length: usize,
    pub uploaded_at: DateTime<Utc>,
    /// Account that uploaded the document, if the request was signed in
    pub owner_id: Option<String>,
}

/// Cached summary; valid only for the same length and focus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSummary {
    pub document_id: String,
    pub summary: String,
    pub max_length: usize,
    pub focus: Option<String>,
    pub source: ProcessingSource,
    pub created_at: DateTime<Utc>,
}

impl StoredSummary {
    pub fn matches(&self, max_length: usize, focus: Option<&str>) -> bool {
        self.max_length == max_length && self.focus.as_deref() == focus
    }
}

/// A generated quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuiz {
    pub quiz_id: String,
    pub document_id: String,
    pub questions: Vec<QuizQuestion>,
    pub difficulty: Difficulty,
    pub source: ProcessingSource,
    pub created_at: DateTime<Utc>,
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub full_name: String,
    /// Trimmed and lowercased
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A signed-in session, keyed by the digest of its bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// RocksDB-backed store for documents, summaries, quizzes and accounts
pub struct DocumentStore {
    db: Arc<DB>,
    files_dir: PathBuf,
    doc_count: AtomicUsize,
    /// Serializes the email uniqueness check with the account write
    signup_lock: Mutex<()>,
}

impl DocumentStore {
    /// Open (or create) the store under `base_path`
    pub fn open(base_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(base_path)
            .with_context(|| format!("Failed to create storage directory {base_path:?}"))?;
        let files_dir = base_path.join("documents");
        std::fs::create_dir_all(&files_dir)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        let db = Arc::new(
            DB::open(&opts, base_path.join("db")).context("Failed to open document database")?,
        );

        let store = Self {
            db,
            files_dir,
            doc_count: AtomicUsize::new(0),
            signup_lock: Mutex::new(()),
        };
        let count = store.count_prefix(DOC_PREFIX);
        store.doc_count.store(count, Ordering::Relaxed);
        DOCUMENTS_STORED.set(count as i64);
        tracing::info!(documents = count, "Document store opened");
        Ok(store)
    }

    fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
        bincode::serde::encode_to_vec(value, bincode::config::standard())
            .context("Failed to encode record")
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        let (value, _) = bincode::serde::decode_from_slice::<T, _>(bytes, bincode::config::standard())
            .context("Failed to decode record")?;
        Ok(value)
    }

    fn get_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<Vec<u8>> {
        let mut keys = Vec::new();
        for (key, _) in self.db.prefix_iterator(prefix.as_bytes()).flatten() {
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            keys.push(key.to_vec());
        }
        keys
    }

    fn count_prefix(&self, prefix: &str) -> usize {
        self.keys_with_prefix(prefix).len()
    }

    /// Write the uploaded bytes to `documents/<id>.<ext>`
    pub fn save_upload_file(&self, id: &str, kind: FileKind, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.files_dir.join(format!("{id}{}", kind.extension()));
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write upload to {path:?}"))?;
        Ok(path)
    }

    pub fn put_document(&self, doc: &StoredDocument) -> Result<()> {
        let key = format!("{DOC_PREFIX}{}", doc.id);
        let existed = self.db.get(key.as_bytes())?.is_some();
        self.db.put(key.as_bytes(), Self::encode(doc)?)?;
        if !existed {
            let count = self.doc_count.fetch_add(1, Ordering::Relaxed) + 1;
            DOCUMENTS_STORED.set(count as i64);
        }
        Ok(())
    }

    pub fn get_document(&self, id: &str) -> Result<Option<StoredDocument>> {
        self.get_record(&format!("{DOC_PREFIX}{id}"))
    }

    /// All documents, newest first
    pub fn list_documents(&self) -> Result<Vec<StoredDocument>> {
        let mut docs = Vec::new();
        for (key, value) in self.db.prefix_iterator(DOC_PREFIX.as_bytes()).flatten() {
            if !key.starts_with(DOC_PREFIX.as_bytes()) {
                break;
            }
            match Self::decode::<StoredDocument>(&value) {
                Ok(doc) => docs.push(doc),
                Err(e) => tracing::warn!("Skipping unreadable document record: {:#}", e),
            }
        }
        docs.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(docs)
    }

    /// Documents uploaded by one account, newest first
    pub fn list_documents_owned_by(&self, owner_id: &str) -> Result<Vec<StoredDocument>> {
        let mut docs = self.list_documents()?;
        docs.retain(|d| d.owner_id.as_deref() == Some(owner_id));
        Ok(docs)
    }

    /// Delete a document with its summary, quizzes and uploaded file
    ///
    /// Returns false when the document does not exist.
    pub fn delete_document(&self, id: &str) -> Result<bool> {
        let Some(doc) = self.get_document(id)? else {
            return Ok(false);
        };

        let mut batch = WriteBatch::default();
        batch.delete(format!("{DOC_PREFIX}{id}").as_bytes());
        batch.delete(format!("{SUMMARY_PREFIX}{id}").as_bytes());

        let index_prefix = format!("{DOC_QUIZ_PREFIX}{id}:");
        let mut quizzes = 0;
        for key in self.keys_with_prefix(&index_prefix) {
            if let Some(quiz_id) = key.get(index_prefix.len()..) {
                let mut quiz_key = QUIZ_PREFIX.as_bytes().to_vec();
                quiz_key.extend_from_slice(quiz_id);
                batch.delete(quiz_key);
                quizzes += 1;
            }
            batch.delete(&key);
        }

        self.db
            .write(batch)
            .context("Failed to write delete batch")?;

        let count = self
            .doc_count
            .fetch_sub(1, Ordering::Relaxed)
            .saturating_sub(1);
        DOCUMENTS_STORED.set(count as i64);

        if let Err(e) = std::fs::remove_file(&doc.filepath) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = ?doc.filepath, "Failed to remove uploaded file: {}", e);
            }
        }

        tracing::debug!(document_id = id, quizzes, "Document deleted");
        Ok(true)
    }

    pub fn put_summary(&self, summary: &StoredSummary) -> Result<()> {
        let key = format!("{SUMMARY_PREFIX}{}", summary.document_id);
        self.db.put(key.as_bytes(), Self::encode(summary)?)?;
        Ok(())
    }

    pub fn get_summary(&self, document_id: &str) -> Result<Option<StoredSummary>> {
        self.get_record(&format!("{SUMMARY_PREFIX}{document_id}"))
    }

    pub fn put_quiz(&self, quiz: &StoredQuiz) -> Result<()> {
        let mut batch = WriteBatch::default();
        batch.put(
            format!("{QUIZ_PREFIX}{}", quiz.quiz_id).as_bytes(),
            Self::encode(quiz)?,
        );
        batch.put(
            format!("{DOC_QUIZ_PREFIX}{}:{}", quiz.document_id, quiz.quiz_id).as_bytes(),
            b"",
        );
        self.db.write(batch).context("Failed to write quiz")?;
        Ok(())
    }

    pub fn get_quiz(&self, quiz_id: &str) -> Result<Option<StoredQuiz>> {
        self.get_record(&format!("{QUIZ_PREFIX}{quiz_id}"))
    }

    /// Store a new account; false when the email is already registered
    pub fn create_user(&self, user: &StoredUser) -> Result<bool> {
        let _guard = self
            .signup_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("signup lock poisoned"))?;

        let email_key = format!("{EMAIL_PREFIX}{}", user.email);
        if self.db.get(email_key.as_bytes())?.is_some() {
            return Ok(false);
        }

        let mut batch = WriteBatch::default();
        batch.put(
            format!("{USER_PREFIX}{}", user.id).as_bytes(),
            Self::encode(user)?,
        );
        batch.put(email_key.as_bytes(), user.id.as_bytes());
        self.db.write(batch).context("Failed to write account")?;
        Ok(true)
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<StoredUser>> {
        self.get_record(&format!("{USER_PREFIX}{user_id}"))
    }

    /// Look an account up by (already normalized) email
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        match self.db.get(format!("{EMAIL_PREFIX}{email}").as_bytes())? {
            Some(id) => self.get_user(&String::from_utf8_lossy(&id)),
            None => Ok(None),
        }
    }

    pub fn put_session(&self, digest: &str, session: &StoredSession) -> Result<()> {
        let key = format!("{SESSION_PREFIX}{digest}");
        self.db.put(key.as_bytes(), Self::encode(session)?)?;
        Ok(())
    }

    pub fn get_session(&self, digest: &str) -> Result<Option<StoredSession>> {
        self.get_record(&format!("{SESSION_PREFIX}{digest}"))
    }

    pub fn delete_session(&self, digest: &str) -> Result<()> {
        self.db
            .delete(format!("{SESSION_PREFIX}{digest}").as_bytes())?;
        Ok(())
    }

    /// Number of stored documents
    pub fn count(&self) -> usize {
        self.doc_count.load(Ordering::Relaxed)
    }

    /// Flush memtables to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush().context("Failed to flush document database")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::QuestionType;
    use tempfile::TempDir;

    fn store() -> (TempDir, DocumentStore) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn document(store: &DocumentStore, id: &str) -> StoredDocument {
        let text = "Some extracted text.";
        let filepath = store
            .save_upload_file(id, FileKind::Txt, text.as_bytes())
            .unwrap();
        StoredDocument {
            id: id.to_string(),
            filename: "notes.txt".to_string(),
            file_type: FileKind::Txt,
            file_size: text.len(),
            filepath,
            extracted_text: text.to_string(),
            text_length: text.chars().count(),
            uploaded_at: Utc::now(),
            owner_id: None,
        }
    }

    fn user(id: &str, email: &str) -> StoredUser {
        StoredUser {
            id: id.to_string(),
            full_name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "pbkdf2-sha256$1000$salt$hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn quiz(quiz_id: &str, document_id: &str) -> StoredQuiz {
        StoredQuiz {
            quiz_id: quiz_id.to_string(),
            document_id: document_id.to_string(),
            questions: vec![QuizQuestion {
                question: "Q?".to_string(),
                question_type: QuestionType::ShortAnswer,
                options: None,
                correct_answer: "A".to_string(),
                explanation: None,
            }],
            difficulty: Difficulty::Medium,
            source: ProcessingSource::RuleBased,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_document_roundtrip_and_count() {
        let (_dir, store) = store();
        let doc = document(&store, "doc-1");
        store.put_document(&doc).unwrap();
        store.put_document(&doc).unwrap();

        assert_eq!(store.count(), 1);
        assert_eq!(store.get_document("doc-1").unwrap(), Some(doc));
        assert!(store.get_document("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_is_newest_first() {
        let (_dir, store) = store();
        let mut older = document(&store, "a");
        older.uploaded_at = Utc::now() - chrono::Duration::hours(1);
        let newer = document(&store, "b");
        store.put_document(&older).unwrap();
        store.put_document(&newer).unwrap();

        let ids: Vec<String> = store
            .list_documents()
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_delete_cascades() {
        let (_dir, store) = store();
        let doc = document(&store, "doc-1");
        let other = document(&store, "doc-10");
        store.put_document(&doc).unwrap();
        store.put_document(&other).unwrap();
        store
            .put_summary(&StoredSummary {
                document_id: "doc-1".to_string(),
                summary: "• S".to_string(),
                max_length: 200,
                focus: None,
                source: ProcessingSource::RuleBased,
                created_at: Utc::now(),
            })
            .unwrap();
        store.put_quiz(&quiz("q1", "doc-1")).unwrap();
        store.put_quiz(&quiz("q2", "doc-10")).unwrap();

        assert!(store.delete_document("doc-1").unwrap());
        assert!(store.get_document("doc-1").unwrap().is_none());
        assert!(store.get_summary("doc-1").unwrap().is_none());
        assert!(store.get_quiz("q1").unwrap().is_none());
        assert!(!doc.filepath.exists());

        // "doc-10" shares a key prefix with "doc-1" but must survive
        assert!(store.get_quiz("q2").unwrap().is_some());
        assert!(other.filepath.exists());
        assert_eq!(store.count(), 1);

        assert!(!store.delete_document("doc-1").unwrap());
    }

    #[test]
    fn test_summary_match() {
        let summary = StoredSummary {
            document_id: "d".to_string(),
            summary: "• S".to_string(),
            max_length: 200,
            focus: Some("cells".to_string()),
            source: ProcessingSource::RuleBased,
            created_at: Utc::now(),
        };
        assert!(summary.matches(200, Some("cells")));
        assert!(!summary.matches(200, None));
        assert!(!summary.matches(100, Some("cells")));
    }

    #[test]
    fn test_reopen_restores_count() {
        let dir = TempDir::new().unwrap();
        {
            let store = DocumentStore::open(dir.path()).unwrap();
            let doc = document(&store, "persisted");
            store.put_document(&doc).unwrap();
            store.flush().unwrap();
        }
        let store = DocumentStore::open(dir.path()).unwrap();
        assert_eq!(store.count(), 1);
        assert!(store.get_document("persisted").unwrap().is_some());
    }

    #[test]
    fn test_create_user_rejects_duplicate_email() {
        let (_dir, store) = store();
        assert!(store.create_user(&user("u1", "ada@example.com")).unwrap());
        assert!(!store.create_user(&user("u2", "ada@example.com")).unwrap());

        let found = store.find_user_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert!(store.get_user("u2").unwrap().is_none());
        assert!(store.find_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_session_roundtrip_and_expiry() {
        let (_dir, store) = store();
        let now = Utc::now();
        let session = StoredSession {
            user_id: "u1".to_string(),
            created_at: now,
            expires_at: now + chrono::Duration::minutes(5),
        };
        store.put_session("digest", &session).unwrap();
        assert_eq!(store.get_session("digest").unwrap(), Some(session.clone()));
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + chrono::Duration::minutes(5)));

        store.delete_session("digest").unwrap();
        assert!(store.get_session("digest").unwrap().is_none());
    }

    #[test]
    fn test_accounts_do_not_count_as_documents() {
        let (_dir, store) = store();
        store.create_user(&user("u1", "ada@example.com")).unwrap();
        let mut owned = document(&store, "mine");
        owned.owner_id = Some("u1".to_string());
        store.put_document(&owned).unwrap();
        store.put_document(&document(&store, "anonymous")).unwrap();

        assert_eq!(store.count(), 2);
        assert_eq!(store.list_documents().unwrap().len(), 2);
        let mine = store.list_documents_owned_by("u1").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "mine");
        assert!(store.list_documents_owned_by("u2").unwrap().is_empty());
    }
}
