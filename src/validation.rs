//! Input validation for request payloads and path parameters

use anyhow::{anyhow, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Summary length bounds in words
pub const MIN_SUMMARY_WORDS: usize = 50;
pub const MAX_SUMMARY_WORDS: usize = 500;
pub const MAX_FOCUS_LENGTH: usize = 100;
pub const MAX_QUESTIONS: usize = 20;
pub const MAX_CHAT_MESSAGE_LENGTH: usize = 4_000;
pub const MAX_TTS_TEXT_LENGTH: usize = 5_000;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_FULL_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// Validate a document or quiz ID (UUID format)
pub fn validate_id(id: &str) -> Result<uuid::Uuid> {
    uuid::Uuid::parse_str(id).map_err(|e| anyhow!("Invalid ID format: {e}"))
}

/// Validate requested summary length
pub fn validate_summary_length(words: usize) -> Result<()> {
    if !(MIN_SUMMARY_WORDS..=MAX_SUMMARY_WORDS).contains(&words) {
        return Err(anyhow!(
            "max_length must be between {MIN_SUMMARY_WORDS} and {MAX_SUMMARY_WORDS} words, got: {words}"
        ));
    }
    Ok(())
}

/// Validate optional summary focus
pub fn validate_focus(focus: Option<&str>) -> Result<()> {
    if let Some(focus) = focus {
        let len = focus.chars().count();
        if len > MAX_FOCUS_LENGTH {
            return Err(anyhow!(
                "focus too long: {len} chars (max: {MAX_FOCUS_LENGTH})"
            ));
        }
    }
    Ok(())
}

/// Validate number of quiz questions
pub fn validate_num_questions(n: usize) -> Result<()> {
    if n == 0 || n > MAX_QUESTIONS {
        return Err(anyhow!(
            "num_questions must be between 1 and {MAX_QUESTIONS}, got: {n}"
        ));
    }
    Ok(())
}

/// Validate a chat message
pub fn validate_chat_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(anyhow!("message cannot be empty"));
    }
    let len = message.chars().count();
    if len > MAX_CHAT_MESSAGE_LENGTH {
        return Err(anyhow!(
            "message too long: {len} chars (max: {MAX_CHAT_MESSAGE_LENGTH})"
        ));
    }
    Ok(())
}

/// Validate text submitted for speech synthesis
pub fn validate_tts_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(anyhow!("text cannot be empty"));
    }
    let len = text.chars().count();
    if len > MAX_TTS_TEXT_LENGTH {
        return Err(anyhow!(
            "text too long: {len} chars (max: {MAX_TTS_TEXT_LENGTH})"
        ));
    }
    Ok(())
}

/// Validate an audio file name: `<uuid>.mp3` only, which also rules out path traversal
pub fn validate_audio_filename(filename: &str) -> Result<()> {
    let stem = filename
        .strip_suffix(".mp3")
        .ok_or_else(|| anyhow!("audio file name must end with .mp3"))?;
    uuid::Uuid::parse_str(stem).map_err(|_| anyhow!("invalid audio file name: {filename}"))?;
    Ok(())
}

/// Validate an account holder's name
pub fn validate_full_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(anyhow!("full_name cannot be empty"));
    }
    if len > MAX_FULL_NAME_LENGTH {
        return Err(anyhow!(
            "full_name too long: {len} chars (max: {MAX_FULL_NAME_LENGTH})"
        ));
    }
    Ok(())
}

/// Validate an email address and return it trimmed and lowercased
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.len() > MAX_EMAIL_LENGTH || !email_regex().is_match(&email) {
        return Err(anyhow!("invalid email address"));
    }
    Ok(email)
}

/// Validate a new password and its confirmation
pub fn validate_new_password(password: &str, confirm: &str) -> Result<()> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(anyhow!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(anyhow!(
            "password too long: {len} chars (max: {MAX_PASSWORD_LENGTH})"
        ));
    }
    if password != confirm {
        return Err(anyhow!("passwords do not match"));
    }
    Ok(())
}
