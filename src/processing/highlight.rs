//! Keyword highlighting with `<mark>` tags

use regex::{Captures, Regex};
use std::sync::OnceLock;

const IMPORTANT_PHRASES: &[&str] = &[
    "in conclusion",
    "to summarize",
    "it is important",
    "keep in mind",
    "take note",
    "remember that",
    "the main point",
    "key finding",
];

const IMPORTANT_WORDS: &[&str] = &[
    "important",
    "key",
    "main",
    "primary",
    "essential",
    "critical",
    "significant",
    "note",
    "remember",
    "focus",
    "attention",
    "warning",
    "caution",
    "summary",
    "conclusion",
    "result",
    "finding",
    "discovery",
    "example",
    "instance",
    "specifically",
    "particularly",
    "especially",
    "must",
    "should",
    "need",
    "require",
    "necessary",
    "vital",
    "crucial",
];

static HIGHLIGHT: OnceLock<Regex> = OnceLock::new();

/// Alternation order is match priority: phrases, then words, then numbers.
fn highlight_regex() -> &'static Regex {
    HIGHLIGHT.get_or_init(|| {
        let phrases = IMPORTANT_PHRASES
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let words = IMPORTANT_WORDS.join("|");
        let pattern = format!(r"(?i)(?:{phrases})|\b(?:{words})\b|\b\d{{4}}\b|\b\d+%|\$\d+");
        Regex::new(&pattern).unwrap()
    })
}

/// Wrap important phrases, words, years, percentages and amounts in `<mark>` tags
///
/// Matched text keeps its original casing; marks never nest.
pub fn highlight(text: &str) -> String {
    highlight_regex()
        .replace_all(text, |caps: &Captures| format!("<mark>{}</mark>", &caps[0]))
        .into_owned()
}
