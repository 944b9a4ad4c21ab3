//! Sentence and word helpers shared by the rule-based heuristics
//!
//! Everything here counts characters, never bytes, so multi-byte text is
//! always cut on a char boundary.

use regex::Regex;
use std::sync::OnceLock;

/// Terminal punctuation that ends a sentence
pub fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split on runs of terminal punctuation; pieces are trimmed and empty ones dropped
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(is_terminal)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// A sentence with the punctuation run that closed it (empty for trailing text)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub body: &'a str,
    pub punct: &'a str,
}

/// Split while keeping terminal punctuation; unterminated trailing text is kept
pub fn split_sentences_keep_punct(text: &str) -> Vec<Sentence<'_>> {
    let mut out = Vec::new();
    let mut body_start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_terminal(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !is_terminal(next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }
        let body = text[body_start..i].trim();
        if !body.is_empty() {
            out.push(Sentence {
                body,
                punct: &text[i..end],
            });
        }
        body_start = end;
    }

    let rest = text[body_start..].trim();
    if !rest.is_empty() {
        out.push(Sentence {
            body: rest,
            punct: "",
        });
    }
    out
}

/// Split into paragraphs on blank lines
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    paragraph_break_regex()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();

fn paragraph_break_regex() -> &'static Regex {
    PARAGRAPH_BREAK.get_or_init(|| Regex::new(r"\n\s*\n").unwrap())
}

/// First `max` chars of `s`
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Number of chars in `s`
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Upper-case the first character
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `word` occurs in `haystack` on word boundaries, ignoring case
///
/// `word` may contain spaces ("refers to"); boundaries are only checked at its ends.
pub fn contains_word(haystack: &str, word: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let word = word.to_lowercase();
    if word.is_empty() {
        return false;
    }

    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&word) {
        let start = from + pos;
        let end = start + word.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            return true;
        }
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Whitespace-separated word count
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_collapses_punctuation_runs() {
        let parts = split_sentences("Hello there!!! How are you?  Fine...");
        assert_eq!(parts, vec!["Hello there", "How are you", "Fine"]);
    }

    #[test]
    fn test_keep_punct_retains_trailing_text() {
        let parts = split_sentences_keep_punct("One. Two?! three without end");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].punct, ".");
        assert_eq!(parts[1].punct, "?!");
        assert_eq!(parts[2].body, "three without end");
        assert_eq!(parts[2].punct, "");
    }

    #[test]
    fn test_split_paragraphs() {
        let paras = split_paragraphs("First para\nstill first\n\n\nSecond\n  \nThird");
        assert_eq!(paras, vec!["First para\nstill first", "Second", "Third"]);
    }

    #[test]
    fn test_truncate_chars_is_boundary_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("This is key.", "key"));
        assert!(contains_word("KEY points", "key"));
        assert!(!contains_word("a monkey", "key"));
        assert!(!contains_word("This island", "is"));
        assert!(contains_word("it refers to that", "refers to"));
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("hello"), "Hello");
        assert_eq!(capitalize_first("élan"), "Élan");
        assert_eq!(capitalize_first(""), "");
    }
}
