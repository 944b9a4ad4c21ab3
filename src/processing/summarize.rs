//! Extractive summarization by sentence scoring

use super::sentences::{
    capitalize_first, char_len, contains_word, split_paragraphs, split_sentences, truncate_chars,
    word_count,
};

/// Words that mark a sentence as worth keeping
pub const IMPORTANCE_KEYWORDS: &[&str] = &[
    "important",
    "key",
    "main",
    "primary",
    "essential",
    "critical",
    "significant",
    "result",
    "finding",
    "conclusion",
    "summary",
    "note",
    "remember",
    "focus",
    "must",
    "should",
    "need",
];

const MIN_SENTENCE_CHARS: usize = 20;
const MAX_SELECTED: usize = 8;
const MAX_EXTRA: usize = 3;
const KEYWORD_BONUS: usize = 50;
const DIGIT_BONUS: usize = 30;
const FOCUS_BONUS: usize = 40;

#[derive(Debug)]
struct Scored<'a> {
    text: &'a str,
    score: usize,
}

/// Rule-based bullet summary of `text`
///
/// Never returns an empty string.
pub fn summarize(text: &str, max_words: usize, focus: Option<&str>) -> String {
    let candidates = candidate_sentences(text);
    let focus_terms = focus_terms(focus);

    let mut scored: Vec<Scored> = candidates
        .iter()
        .map(|s| Scored {
            text: s,
            score: score_sentence(s, &focus_terms),
        })
        .collect();
    // Stable: equal scores stay in document order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    let take = (max_words / 20).min(MAX_SELECTED).min(scored.len()).max(1);
    let mut bullets: Vec<String> = scored
        .iter()
        .take(take)
        .map(|s| bullet(s.text))
        .collect();

    let mut words: usize = scored.iter().take(take).map(|s| word_count(s.text)).sum();
    for extra in scored.iter().skip(take).take(MAX_EXTRA) {
        if words >= max_words / 2 {
            break;
        }
        words += word_count(extra.text);
        bullets.push(bullet(extra.text));
    }

    let summary = bullets.join("\n");
    if summary.trim().trim_start_matches('•').trim().is_empty() {
        return format!("• {}...", truncate_chars(text.trim(), 200));
    }
    summary
}

/// Sentences over 20 chars, else up to 5 paragraphs, else the first 300 chars
fn candidate_sentences(text: &str) -> Vec<&str> {
    let sentences: Vec<&str> = split_sentences(text)
        .into_iter()
        .filter(|s| char_len(s) > MIN_SENTENCE_CHARS)
        .collect();
    if !sentences.is_empty() {
        return sentences;
    }

    let paragraphs: Vec<&str> = split_paragraphs(text)
        .into_iter()
        .take(5)
        .map(|p| truncate_chars(p, 200))
        .collect();
    if !paragraphs.is_empty() {
        return paragraphs;
    }

    let head = truncate_chars(text.trim(), 300);
    if head.is_empty() {
        Vec::new()
    } else {
        vec![head]
    }
}

fn focus_terms(focus: Option<&str>) -> Vec<String> {
    focus
        .map(|f| {
            f.split(|c: char| !c.is_alphanumeric())
                .filter(|w| char_len(w) >= 3)
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default()
}

fn score_sentence(sentence: &str, focus_terms: &[String]) -> usize {
    let mut score = char_len(sentence);
    score += IMPORTANCE_KEYWORDS
        .iter()
        .filter(|k| contains_word(sentence, k))
        .count()
        * KEYWORD_BONUS;
    if sentence.chars().any(|c| c.is_ascii_digit()) {
        score += DIGIT_BONUS;
    }
    score += focus_terms
        .iter()
        .filter(|t| contains_word(sentence, t))
        .count()
        * FOCUS_BONUS;
    score
}

fn bullet(sentence: &str) -> String {
    format!("• {}", capitalize_first(sentence.trim()))
}
