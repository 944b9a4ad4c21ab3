//! Text-to-speech narration stored as MP3 files

use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::{AppError, Result};
use crate::processing::sentences::{char_len, truncate_chars, word_count};
use crate::processing::LlmClient;
use crate::validation::MAX_TTS_TEXT_LENGTH;

const WORDS_PER_MINUTE: f64 = 150.0;
const SLOW_SPEED: f32 = 0.85;
const DEFAULT_VOICE: &str = "alloy";
const TRUNCATION_MARKER: &str = "... [Text truncated for audio]";

/// A synthesized audio file
#[derive(Debug, Clone)]
pub struct SpeechResult {
    pub audio_url: String,
    pub text: String,
    pub language: String,
    pub duration_seconds: f64,
}

/// Synthesizes speech through the language model API and serves the files
pub struct SpeechService {
    llm: Option<Arc<LlmClient>>,
    audio_dir: PathBuf,
    public_base_url: String,
}

impl SpeechService {
    pub fn new(
        llm: Option<Arc<LlmClient>>,
        audio_dir: PathBuf,
        public_base_url: &str,
    ) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&audio_dir)?;
        Ok(Self {
            llm,
            audio_dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_available(&self) -> bool {
        self.llm.is_some()
    }

    /// Synthesize `text` and store it as `<uuid>.mp3`
    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
        slow: bool,
        voice: Option<&str>,
    ) -> Result<SpeechResult> {
        let llm = self.llm.as_ref().ok_or(AppError::LlmUnavailable)?;

        let speed = if slow { SLOW_SPEED } else { 1.0 };
        let voice = voice
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VOICE);
        let audio = llm
            .synthesize_speech(text, voice, speed)
            .await
            .map_err(|e| AppError::LlmError(format!("{e:#}")))?;

        let filename = format!("{}.mp3", uuid::Uuid::new_v4());
        let path = self.audio_dir.join(&filename);
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| AppError::StorageError(format!("failed to write audio: {e}")))?;

        tracing::info!(file = %filename, bytes = audio.len(), slow, "Audio generated");

        Ok(SpeechResult {
            audio_url: format!("{}/tts/audio/{}", self.public_base_url, filename),
            text: text.to_string(),
            language: language.to_string(),
            duration_seconds: estimate_duration(text),
        })
    }

    /// Read a stored audio file; the name must already be validated
    pub async fn read_audio(&self, filename: &str) -> Result<Vec<u8>> {
        match tokio::fs::read(self.audio_dir.join(filename)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::AudioNotFound(filename.to_string()))
            }
            Err(e) => Err(AppError::StorageError(e.to_string())),
        }
    }

    /// Delete a stored audio file; the name must already be validated
    pub async fn delete_audio(&self, filename: &str) -> Result<()> {
        match tokio::fs::remove_file(self.audio_dir.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::AudioNotFound(filename.to_string()))
            }
            Err(e) => Err(AppError::StorageError(e.to_string())),
        }
    }
}

/// Seconds at 150 words per minute, one decimal place
pub fn estimate_duration(text: &str) -> f64 {
    let seconds = word_count(text) as f64 / WORDS_PER_MINUTE * 60.0;
    (seconds * 10.0).round() / 10.0
}

/// Cut narration text to the audio limit with a visible marker
pub fn prepare_narration(text: &str) -> String {
    if char_len(text) > MAX_TTS_TEXT_LENGTH {
        format!("{}{}", truncate_chars(text, MAX_TTS_TEXT_LENGTH), TRUNCATION_MARKER)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_estimate_duration() {
        let text = vec!["word"; 150].join(" ");
        assert_eq!(estimate_duration(&text), 60.0);
        assert_eq!(estimate_duration("one two three"), 1.2);
        assert_eq!(estimate_duration(""), 0.0);
    }

    #[test]
    fn test_prepare_narration_truncates() {
        let long = "a".repeat(MAX_TTS_TEXT_LENGTH + 10);
        let out = prepare_narration(&long);
        assert!(out.ends_with("[Text truncated for audio]"));
        assert_eq!(prepare_narration("short"), "short");
    }

    #[tokio::test]
    async fn test_synthesize_without_model_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let service = SpeechService::new(None, dir.path().join("audio"), "http://x").unwrap();
        let err = service.synthesize("hi", "en", false, None).await.unwrap_err();
        assert_eq!(err.code(), "LLM_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_read_and_delete_audio() {
        let dir = TempDir::new().unwrap();
        let audio_dir = dir.path().join("audio");
        let service = SpeechService::new(None, audio_dir.clone(), "http://x").unwrap();
        let name = format!("{}.mp3", uuid::Uuid::new_v4());
        std::fs::write(audio_dir.join(&name), b"ID3").unwrap();

        assert_eq!(service.read_audio(&name).await.unwrap(), b"ID3");
        service.delete_audio(&name).await.unwrap();
        assert_eq!(
            service.delete_audio(&name).await.unwrap_err().code(),
            "AUDIO_NOT_FOUND"
        );
        assert_eq!(
            service.read_audio(&name).await.unwrap_err().code(),
            "AUDIO_NOT_FOUND"
        );
    }
}
