//! Text Processing Pipeline
//!
//! Every operation tries the language model when one is configured and falls
//! back to a deterministic rule-based heuristic on any failure.
//!
//! # Architecture
//! ```text
//! request → TextEngine → Processed<T> { value, source }
//!              ↓
//!     ┌────────┴────────┐
//!     │                 │
//! LlmClient        rule-based
//! (optional)       (always available)
//! ```

pub mod accessibility;
pub mod chat;
pub mod highlight;
pub mod llm;
pub mod quiz;
pub mod sentences;
pub mod simplify;
pub mod summarize;

pub use accessibility::AccessibilitySettings;
pub use chat::ChatMessage;
pub use llm::LlmClient;
pub use quiz::{Difficulty, QuestionType, QuestionTypes, QuizQuestion};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::metrics::PROCESSING_TOTAL;
use sentences::truncate_chars;

const SUMMARY_INPUT_CHARS: usize = 16_000;
const SIMPLIFY_INPUT_CHARS: usize = 6_000;
const QUIZ_INPUT_CHARS: usize = 8_000;

/// Which path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingSource {
    Llm,
    RuleBased,
}

impl ProcessingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::RuleBased => "rule_based",
        }
    }
}

/// A result tagged with the path that produced it
#[derive(Debug, Clone)]
pub struct Processed<T> {
    pub value: T,
    pub source: ProcessingSource,
}

impl<T> Processed<T> {
    fn new(operation: &str, value: T, source: ProcessingSource) -> Self {
        PROCESSING_TOTAL
            .with_label_values(&[operation, source.as_str()])
            .inc();
        Self { value, source }
    }
}

/// Chat reply plus the conversation it extends
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub history: Vec<ChatMessage>,
}

/// Runs text operations against the model with rule-based fallback
pub struct TextEngine {
    llm: Option<Arc<LlmClient>>,
}

impl TextEngine {
    pub fn new(llm: Option<Arc<LlmClient>>) -> Self {
        Self { llm }
    }

    /// Engine that never calls a model
    pub fn rule_based() -> Self {
        Self { llm: None }
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Bullet-point summary of at most `max_words` words
    pub async fn summarize(
        &self,
        text: &str,
        max_words: usize,
        focus: Option<&str>,
    ) -> Processed<String> {
        if let Some(llm) = &self.llm {
            let focus_line = focus
                .filter(|f| !f.trim().is_empty())
                .map(|f| format!("Focus especially on: {f}.\n"))
                .unwrap_or_default();
            let messages = [
                ChatMessage::system(
                    "You summarize educational text for readers with dyslexia and ADHD. \
                     Use short, plain bullet points.",
                ),
                ChatMessage::user(format!(
                    "Summarize the text below in at most {max_words} words as bullet points \
                     starting with •.\n{focus_line}\nText:\n{}",
                    truncate_chars(text, SUMMARY_INPUT_CHARS)
                )),
            ];
            let max_tokens = (max_words as u32).saturating_mul(2).max(256);
            match llm.complete(&messages, 0.3, max_tokens).await {
                Ok(summary) => return Processed::new("summary", summary, ProcessingSource::Llm),
                Err(e) => warn!("Model summary failed, using rule-based: {:#}", e),
            }
        }

        Processed::new(
            "summary",
            summarize::summarize(text, max_words, focus),
            ProcessingSource::RuleBased,
        )
    }

    /// Keyword highlighting (rule-based only)
    pub fn highlight(&self, text: &str) -> String {
        Processed::new("highlight", highlight::highlight(text), ProcessingSource::RuleBased).value
    }

    /// Plain-language rewrite
    pub async fn simplify(&self, text: &str) -> Processed<String> {
        if let Some(llm) = &self.llm {
            let messages = [
                ChatMessage::system(
                    "You simplify text for people with dyslexia and ADHD. Use simpler words, \
                     shorter sentences and a clear structure. Keep the original meaning.",
                ),
                ChatMessage::user(format!(
                    "Simplify this text:\n\n{}",
                    truncate_chars(text, SIMPLIFY_INPUT_CHARS)
                )),
            ];
            match llm.complete(&messages, 0.3, 2000).await {
                Ok(simplified) => {
                    return Processed::new("simplify", simplified, ProcessingSource::Llm)
                }
                Err(e) => warn!("Model simplification failed, using rule-based: {:#}", e),
            }
        }

        Processed::new(
            "simplify",
            simplify::simplify(text),
            ProcessingSource::RuleBased,
        )
    }

    /// Quiz of up to `n` questions; an empty vector means nothing could be generated
    pub async fn generate_quiz<R: Rng + Send + ?Sized>(
        &self,
        text: &str,
        types: QuestionTypes,
        n: usize,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Processed<Vec<QuizQuestion>> {
        if let Some(llm) = &self.llm {
            let prompt =
                quiz::build_prompt(truncate_chars(text, QUIZ_INPUT_CHARS), types, n, difficulty);
            let messages = [
                ChatMessage::system(
                    "You write quizzes that check understanding of educational text. \
                     Reply with valid JSON only.",
                ),
                ChatMessage::user(prompt),
            ];
            match llm.complete(&messages, 0.5, 2000).await {
                Ok(output) => {
                    let questions = quiz::parse_model_quiz(&output, types, n);
                    if !questions.is_empty() {
                        return Processed::new("quiz", questions, ProcessingSource::Llm);
                    }
                    warn!("Model quiz had no usable questions, using rule-based");
                }
                Err(e) => warn!("Model quiz failed, using rule-based: {:#}", e),
            }
        }

        let questions = quiz::generate_rule_based(text, types, n, rng);
        debug!(count = questions.len(), "Rule-based quiz generated");
        Processed::new("quiz", questions, ProcessingSource::RuleBased)
    }

    /// Reply to a chat message and return the extended history
    pub async fn chat(&self, message: &str, history: &[ChatMessage]) -> Processed<ChatReply> {
        if let Some(llm) = &self.llm {
            let messages = chat::build_messages(message, history);
            match llm.complete(&messages, 0.7, 500).await {
                Ok(response) => {
                    let history = chat::extend_history(history, message, &response);
                    return Processed::new(
                        "chat",
                        ChatReply { response, history },
                        ProcessingSource::Llm,
                    );
                }
                Err(e) => warn!("Model chat failed, using rule-based: {:#}", e),
            }
        }

        let response = chat::rule_based_reply(message).to_string();
        let history = chat::extend_history(history, message, &response);
        Processed::new(
            "chat",
            ChatReply { response, history },
            ProcessingSource::RuleBased,
        )
    }
}
