//! Rule-based plain-language rewrite

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::sentences::{capitalize_first, char_len, split_paragraphs, split_sentences_keep_punct};

const REPLACEMENTS: &[(&str, &str)] = &[
    ("utilize", "use"),
    ("approximately", "about"),
    ("facilitate", "help"),
    ("demonstrate", "show"),
    ("indicate", "show"),
    ("obtain", "get"),
    ("acquire", "get"),
    ("comprehend", "understand"),
    ("perceive", "see"),
    ("commence", "start"),
    ("terminate", "end"),
    ("sufficient", "enough"),
    ("numerous", "many"),
    ("substantial", "large"),
    ("minimal", "small"),
    ("significant", "important"),
    ("essential", "important"),
    ("fundamental", "basic"),
    ("complex", "hard"),
    ("simplify", "make simple"),
    ("clarify", "explain"),
    ("elaborate", "explain more"),
];

const LONG_SENTENCE_CHARS: usize = 100;
const LONG_PARAGRAPH_CHARS: usize = 500;
const TARGET_PARAGRAPH_CHARS: usize = 300;

static COMPLEX_WORDS: OnceLock<Regex> = OnceLock::new();

fn complex_words_regex() -> &'static Regex {
    COMPLEX_WORDS.get_or_init(|| {
        let words = REPLACEMENTS
            .iter()
            .map(|(w, _)| *w)
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b(?:{words})\b")).unwrap()
    })
}

/// Simplify `text`: swap complex words, split long sentences, break long paragraphs
///
/// Returns the trimmed input if the rewrite would come out empty.
pub fn simplify(text: &str) -> String {
    let replaced = replace_complex_words(text);

    let mut paragraphs = Vec::new();
    for para in split_paragraphs(&replaced) {
        let units = sentence_units(para);
        let joined = units.join(" ");
        if char_len(&joined) > LONG_PARAGRAPH_CHARS {
            paragraphs.extend(rechunk(&units));
        } else if !joined.is_empty() {
            paragraphs.push(joined);
        }
    }

    let out = paragraphs.join("\n\n");
    if out.trim().is_empty() {
        text.trim().to_string()
    } else {
        out
    }
}

fn replace_complex_words(text: &str) -> String {
    complex_words_regex()
        .replace_all(text, |caps: &Captures| {
            let found = &caps[0];
            let lower = found.to_lowercase();
            let simple = REPLACEMENTS
                .iter()
                .find(|(w, _)| *w == lower)
                .map(|(_, s)| *s)
                .unwrap_or(found);
            if found.chars().next().is_some_and(char::is_uppercase) {
                capitalize_first(simple)
            } else {
                simple.to_string()
            }
        })
        .into_owned()
}

/// Sentences of one paragraph, with long comma-laden sentences broken apart
fn sentence_units(paragraph: &str) -> Vec<String> {
    let mut units = Vec::new();
    for sentence in split_sentences_keep_punct(paragraph) {
        if char_len(sentence.body) > LONG_SENTENCE_CHARS && sentence.body.contains(',') {
            let parts = sentence
                .body
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty());
            for (i, part) in parts.enumerate() {
                let part = if i == 0 {
                    part.to_string()
                } else {
                    capitalize_first(part)
                };
                units.push(format!("{part}{}", sentence.punct));
            }
        } else {
            units.push(format!("{}{}", sentence.body, sentence.punct));
        }
    }
    units
}

/// Group sentence units into paragraphs of roughly 300 chars
fn rechunk(units: &[String]) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for unit in units {
        if !current.is_empty() && char_len(&current) + char_len(unit) > TARGET_PARAGRAPH_CHARS {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(unit);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
