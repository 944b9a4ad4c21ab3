//! OpenAI-compatible language model client
//!
//! Chat completions (`/v1/chat/completions`) for text operations and
//! speech synthesis (`/v1/audio/speech`) for narration.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::chat::ChatMessage;
use crate::config::LlmConfig;
use crate::metrics::LLM_REQUEST_DURATION;

/// Async HTTP client for an OpenAI-compatible API
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    tts_model: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    speed: f32,
    response_format: &'static str,
}

impl LlmClient {
    /// Build a client from configuration; `None` when no API key is set
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        if !config.is_enabled() {
            return Ok(None);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            tts_model: config.tts_model.clone(),
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run a chat completion and return the trimmed reply text
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let start = Instant::now();
        let result = self.complete_inner(messages, temperature, max_tokens).await;
        observe("chat", &result, start);
        result
    }

    async fn complete_inner(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("HTTP request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("API returned status: {}", response.status()));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(anyhow!("No response content from API"));
        }
        Ok(content)
    }

    /// Synthesize speech and return MP3 bytes
    pub async fn synthesize_speech(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<u8>> {
        let start = Instant::now();
        let result = self.synthesize_inner(text, voice, speed).await;
        observe("speech", &result, start);
        result
    }

    async fn synthesize_inner(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            model: &self.tts_model,
            input: text,
            voice,
            speed,
            response_format: "mp3",
        };
        let url = format!("{}/v1/audio/speech", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("HTTP request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("API returned status: {}", response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read audio body")?;
        if bytes.is_empty() {
            return Err(anyhow!("API returned empty audio"));
        }
        Ok(bytes.to_vec())
    }
}

fn observe<T>(endpoint: &str, result: &Result<T>, start: Instant) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    LLM_REQUEST_DURATION
        .with_label_values(&[endpoint, outcome])
        .observe(start.elapsed().as_secs_f64());
}

/// Pull the JSON object or array out of model output that may carry prose or markdown fences
pub fn extract_json(output: &str) -> &str {
    let cleaned = output
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let Some(start) = cleaned.find(['{', '[']) else {
        return cleaned;
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in cleaned[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &cleaned[start..start + i + c.len_utf8()];
                }
            }
            _ => {}
        }
    }
    &cleaned[start..]
}
