//! Quiz generation: question types, rule-based synthesis and model output parsing

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::llm::extract_json;
use super::sentences::{char_len, contains_word, split_sentences, truncate_chars};

/// Kind of quiz question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Mcq,
    TrueFalse,
    ShortAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::TrueFalse => "true_false",
            Self::ShortAnswer => "short_answer",
        }
    }

    /// Lenient parse of type names as models tend to write them
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "mcq" | "multiplechoice" => Some(Self::Mcq),
            "truefalse" | "tf" | "boolean" => Some(Self::TrueFalse),
            "shortanswer" | "short" | "openended" => Some(Self::ShortAnswer),
            _ => None,
        }
    }
}

/// Question types selected for a quiz
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionTypes {
    pub mcq: bool,
    pub true_false: bool,
    pub short_answer: bool,
}

impl QuestionTypes {
    pub fn any(&self) -> bool {
        self.mcq || self.true_false || self.short_answer
    }

    pub fn allows(&self, kind: QuestionType) -> bool {
        match kind {
            QuestionType::Mcq => self.mcq,
            QuestionType::TrueFalse => self.true_false,
            QuestionType::ShortAnswer => self.short_answer,
        }
    }

    /// Enabled types in fixed order
    pub fn enabled(&self) -> Vec<QuestionType> {
        [
            QuestionType::Mcq,
            QuestionType::TrueFalse,
            QuestionType::ShortAnswer,
        ]
        .into_iter()
        .filter(|k| self.allows(*k))
        .collect()
    }

    fn describe(&self) -> String {
        self.enabled()
            .iter()
            .map(QuestionType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Requested difficulty; only shapes the model prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// A generated question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub question_type: QuestionType,
    /// Present for MCQ and true/false
    pub options: Option<Vec<String>>,
    /// Letter A-D for MCQ, "True"/"False", or a short expected answer
    pub correct_answer: String,
    pub explanation: Option<String>,
}

const QUIZ_KEYWORDS: &[&str] = &[
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
    "definition",
    "means",
    "is",
    "are",
    "was",
    "were",
    "can",
    "cannot",
];

const DEFINITION_CUES: &[&str] = &["is", "means", "refers to", "defined as"];

const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "also", "because", "been", "before", "being", "between",
    "both", "could", "does", "doing", "during", "each", "from", "have", "having", "here", "into",
    "itself", "just", "more", "most", "only", "other", "over", "same", "should", "some", "such",
    "than", "that", "their", "them", "then", "there", "these", "they", "this", "those", "through",
    "under", "until", "very", "were", "what", "when", "where", "which", "while", "with", "would",
    "your",
];

const GENERIC_OPTIONS: &[&str] = &[
    "None of the above",
    "All of the above",
    "Not mentioned in the text",
];

const MIN_QUIZ_SENTENCE_CHARS: usize = 30;
const MIN_SCORE: usize = 5;
const BLANK: &str = "_____";

static NUMBER: OnceLock<Regex> = OnceLock::new();
static WORD: OnceLock<Regex> = OnceLock::new();
static AUXILIARY: OnceLock<Regex> = OnceLock::new();

fn number_regex() -> &'static Regex {
    NUMBER.get_or_init(|| Regex::new(r"\d+(?:[.,]\d+)*%?").unwrap())
}

fn word_regex() -> &'static Regex {
    WORD.get_or_init(|| Regex::new(r"[\p{L}][\p{L}'-]*[\p{L}]").unwrap())
}

fn auxiliary_regex() -> &'static Regex {
    AUXILIARY.get_or_init(|| Regex::new(r"(?i)\b(is|are|was|were|has|have|can)\b").unwrap())
}

/// Sentences scored above the threshold, best first, at most `2 * n`
pub fn key_sentences(text: &str, n: usize) -> Vec<&str> {
    let mut scored: Vec<(usize, &str)> = Vec::new();
    for sentence in split_sentences(text) {
        if char_len(sentence) <= MIN_QUIZ_SENTENCE_CHARS {
            continue;
        }
        if scored.iter().any(|(_, s)| *s == sentence) {
            continue;
        }
        let mut score = QUIZ_KEYWORDS
            .iter()
            .filter(|k| contains_word(sentence, k))
            .count()
            * 10;
        if sentence.chars().any(|c| c.is_ascii_digit()) {
            score += 5;
        }
        if DEFINITION_CUES.iter().any(|c| contains_word(sentence, c)) {
            score += 15;
        }
        if score > MIN_SCORE {
            scored.push((score, sentence));
        }
    }
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(n.saturating_mul(2))
        .map(|(_, s)| s)
        .collect()
}

/// Location of the term an MCQ blanks out: a number if present, else the longest content word
fn key_term(sentence: &str) -> Option<(usize, usize)> {
    if let Some(m) = number_regex().find(sentence) {
        return Some((m.start(), m.end()));
    }
    word_regex()
        .find_iter(sentence)
        .filter(|m| {
            char_len(m.as_str()) >= 4 && !STOPWORDS.contains(&m.as_str().to_lowercase().as_str())
        })
        .fold(None, |best: Option<regex::Match>, m| match best {
            Some(b) if char_len(b.as_str()) >= char_len(m.as_str()) => Some(b),
            _ => Some(m),
        })
        .map(|m| (m.start(), m.end()))
}

fn term_text(sentence: &str) -> Option<&str> {
    key_term(sentence).map(|(s, e)| &sentence[s..e])
}

fn option_letter(index: usize) -> String {
    char::from(b'A' + index as u8).to_string()
}

fn build_mcq<R: Rng + ?Sized>(
    sentence: &str,
    pool: &[&str],
    rng: &mut R,
) -> Option<QuizQuestion> {
    if sentence.split_whitespace().count() <= 5 {
        return None;
    }
    let (start, end) = key_term(sentence)?;
    let answer = &sentence[start..end];
    let question = format!(
        "Fill in the blank: {}{}{}",
        &sentence[..start],
        BLANK,
        &sentence[end..]
    );

    let mut options: Vec<String> = vec![answer.to_string()];
    for other in pool.iter().filter(|s| **s != sentence) {
        if options.len() == 4 {
            break;
        }
        if let Some(term) = term_text(other) {
            let lower = term.to_lowercase();
            if !options.iter().any(|o| o.to_lowercase() == lower) {
                options.push(term.to_string());
            }
        }
    }
    for generic in GENERIC_OPTIONS {
        if options.len() == 4 {
            break;
        }
        options.push(generic.to_string());
    }

    options.shuffle(rng);
    let correct = options.iter().position(|o| o == answer)?;

    Some(QuizQuestion {
        question,
        question_type: QuestionType::Mcq,
        options: Some(options),
        correct_answer: option_letter(correct),
        explanation: Some(truncate_chars(sentence, 150).to_string()),
    })
}

/// Words that already make a statement negative
const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot",
];

fn is_negative(statement: &str) -> bool {
    let lower = statement.to_lowercase();
    lower.contains("n't")
        || lower.contains("n\u{2019}t")
        || NEGATORS.iter().any(|w| contains_word(&lower, w))
}

/// Negate a statement at its first auxiliary verb
///
/// `None` when there is no usable auxiliary, when the statement is already
/// negative, or when it opens with the auxiliary (a question).
pub fn negate(statement: &str) -> Option<String> {
    if is_negative(statement) {
        return None;
    }
    let m = auxiliary_regex()
        .find_iter(statement)
        .find(|m| !statement[m.end()..].starts_with(['\'', '\u{2019}']))?;
    if statement[..m.start()].trim().is_empty() {
        return None;
    }
    let aux = m.as_str();
    let rest = &statement[m.end()..];
    let replaced = if aux.eq_ignore_ascii_case("can") {
        format!("{aux}not")
    } else {
        format!("{aux} not")
    };
    Some(format!("{}{}{}", &statement[..m.start()], replaced, rest))
}

fn build_true_false(sentence: &str, negate_this: bool) -> QuizQuestion {
    let statement = truncate_chars(sentence, 150).trim();
    let negated = if negate_this { negate(statement) } else { None };

    match negated {
        Some(false_statement) => QuizQuestion {
            question: format!("True or False: {false_statement}"),
            question_type: QuestionType::TrueFalse,
            options: Some(vec!["True".to_string(), "False".to_string()]),
            correct_answer: "False".to_string(),
            explanation: Some(format!(
                "This statement is incorrect. The text says: {}",
                truncate_chars(sentence, 100)
            )),
        },
        None => QuizQuestion {
            question: format!("True or False: {statement}"),
            question_type: QuestionType::TrueFalse,
            options: Some(vec!["True".to_string(), "False".to_string()]),
            correct_answer: "True".to_string(),
            explanation: Some(truncate_chars(sentence, 150).to_string()),
        },
    }
}

fn build_short_answer(sentence: &str) -> Option<QuizQuestion> {
    let words: Vec<&str> = sentence.split_whitespace().collect();
    if words.len() <= 5 {
        return None;
    }
    Some(QuizQuestion {
        question: format!("Explain briefly: {}?", truncate_chars(sentence, 120)),
        question_type: QuestionType::ShortAnswer,
        options: None,
        correct_answer: words.iter().take(8).copied().collect::<Vec<_>>().join(" "),
        explanation: Some(truncate_chars(sentence, 200).to_string()),
    })
}

fn main_idea_question(sentence: &str) -> QuizQuestion {
    QuizQuestion {
        question: format!("What is the main idea of: {}?", truncate_chars(sentence, 100)),
        question_type: QuestionType::ShortAnswer,
        options: None,
        correct_answer: truncate_chars(sentence, 100).to_string(),
        explanation: Some(truncate_chars(sentence, 150).to_string()),
    }
}

/// Rule-based quiz
///
/// Types are taken in turn over the key sentences; a sentence that cannot
/// carry the current type is offered to the next one. Each sentence is used
/// once, gaps are filled with main-idea questions, and the result is cut to `n`.
pub fn generate_rule_based<R: Rng + ?Sized>(
    text: &str,
    types: QuestionTypes,
    n: usize,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    let pool = key_sentences(text, n);
    let kinds = types.enabled();
    let mut used = vec![false; pool.len()];
    let mut questions = Vec::with_capacity(n);
    let mut true_false_count = 0usize;
    let mut turn = 0usize;

    if !kinds.is_empty() {
        for (i, sentence) in pool.iter().enumerate() {
            if questions.len() >= n {
                break;
            }
            for offset in 0..kinds.len() {
                let kind = kinds[(turn + offset) % kinds.len()];
                let built = match kind {
                    QuestionType::Mcq => build_mcq(sentence, &pool, rng),
                    QuestionType::TrueFalse => {
                        let q = build_true_false(sentence, true_false_count % 3 == 0);
                        true_false_count += 1;
                        Some(q)
                    }
                    QuestionType::ShortAnswer => build_short_answer(sentence),
                };
                if let Some(q) = built {
                    questions.push(q);
                    used[i] = true;
                    turn = (turn + offset + 1) % kinds.len();
                    break;
                }
            }
        }
    }

    for (i, sentence) in pool.iter().enumerate() {
        if questions.len() >= n {
            break;
        }
        if !used[i] {
            questions.push(main_idea_question(sentence));
            used[i] = true;
        }
    }

    questions.truncate(n);
    questions
}

/// Prompt asking the model for a JSON quiz
pub fn build_prompt(text: &str, types: QuestionTypes, n: usize, difficulty: Difficulty) -> String {
    format!(
        "Generate {n} quiz questions from the text below.\n\
         Question types to use: {}.\n\
         Difficulty: {}.\n\n\
         Reply with JSON only, in this shape:\n\
         {{\"questions\": [{{\"question\": \"...\", \"question_type\": \"mcq|true_false|short_answer\", \
         \"options\": [\"...\"], \"correct_answer\": \"A\", \"explanation\": \"...\"}}]}}\n\
         For mcq give four options and the letter of the correct one. \
         For true_false use options [\"True\", \"False\"].\n\n\
         Text:\n{text}",
        types.describe(),
        difficulty.as_str()
    )
}

#[derive(Debug, Deserialize)]
struct ModelQuiz {
    questions: Vec<ModelQuestion>,
}

#[derive(Debug, Deserialize)]
struct ModelQuestion {
    question: String,
    #[serde(alias = "type")]
    question_type: String,
    #[serde(default)]
    options: Option<Vec<String>>,
    correct_answer: String,
    #[serde(default)]
    explanation: Option<String>,
}

/// Parse model output into validated questions of the allowed types
pub fn parse_model_quiz(output: &str, types: QuestionTypes, n: usize) -> Vec<QuizQuestion> {
    let json = extract_json(output);
    let raw: Vec<ModelQuestion> = match serde_json::from_str::<ModelQuiz>(json) {
        Ok(quiz) => quiz.questions,
        Err(_) => match serde_json::from_str::<Vec<ModelQuestion>>(json) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Failed to parse model quiz output: {}", e);
                return Vec::new();
            }
        },
    };

    raw.into_iter()
        .filter_map(|q| convert_model_question(q, types))
        .take(n)
        .collect()
}

fn convert_model_question(q: ModelQuestion, types: QuestionTypes) -> Option<QuizQuestion> {
    let kind = QuestionType::parse(&q.question_type)?;
    if !types.allows(kind) || q.question.trim().is_empty() {
        return None;
    }
    let explanation = q.explanation.filter(|e| !e.trim().is_empty());

    match kind {
        QuestionType::Mcq => {
            let options: Vec<String> = q
                .options?
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .take(26)
                .collect();
            if options.len() < 2 {
                return None;
            }
            let correct = mcq_answer_letter(&q.correct_answer, &options)?;
            Some(QuizQuestion {
                question: q.question.trim().to_string(),
                question_type: kind,
                options: Some(options),
                correct_answer: correct,
                explanation,
            })
        }
        QuestionType::TrueFalse => {
            let answer = match q.correct_answer.trim().to_lowercase().as_str() {
                "true" | "t" => "True",
                "false" | "f" => "False",
                _ => return None,
            };
            Some(QuizQuestion {
                question: q.question.trim().to_string(),
                question_type: kind,
                options: Some(vec!["True".to_string(), "False".to_string()]),
                correct_answer: answer.to_string(),
                explanation,
            })
        }
        QuestionType::ShortAnswer => {
            let answer = q.correct_answer.trim();
            if answer.is_empty() {
                return None;
            }
            Some(QuizQuestion {
                question: q.question.trim().to_string(),
                question_type: kind,
                options: None,
                correct_answer: answer.to_string(),
                explanation,
            })
        }
    }
}

/// Letter for an MCQ answer given either as a letter ("B", "b)", "B.") or as option text
fn mcq_answer_letter(answer: &str, options: &[String]) -> Option<String> {
    let trimmed = answer.trim();
    let stripped = trimmed.trim_end_matches([')', '.', ':']).trim();
    if stripped.chars().count() == 1 {
        let c = stripped.chars().next()?.to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            let index = (c as u8 - b'A') as usize;
            if index < options.len() {
                return Some(option_letter(index));
            }
        }
    }
    let lower = trimmed.to_lowercase();
    options
        .iter()
        .position(|o| o.to_lowercase() == lower)
        .map(option_letter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TEXT: &str = "Photosynthesis is the process plants use to turn light into energy. \
        The main result of photosynthesis is oxygen released into the air. \
        Chlorophyll is the key pigment that absorbs sunlight in leaves. \
        About 70 percent of the oxygen we breathe is made by ocean plants. \
        Water and carbon dioxide are the essential inputs of the reaction. \
        The weather today was cloudy with some rain in the afternoon hours.";

    fn all_types() -> QuestionTypes {
        QuestionTypes {
            mcq: true,
            true_false: true,
            short_answer: true,
        }
    }

    #[test]
    fn test_key_sentences_are_ranked_and_bounded() {
        let keys = key_sentences(TEXT, 2);
        assert_eq!(keys.len(), 4);
        assert!(keys[0].contains("main result"));
    }

    #[test]
    fn test_key_sentences_skip_short_ones() {
        assert!(key_sentences("This is short. Tiny is here.", 5).is_empty());
    }

    #[test]
    fn test_mcq_blanks_number_and_has_four_options() {
        let mut rng = StdRng::seed_from_u64(7);
        let types = QuestionTypes {
            mcq: true,
            ..Default::default()
        };
        let questions = generate_rule_based(TEXT, types, 6, &mut rng);
        let numeric = questions
            .iter()
            .find(|q| q.question.contains("percent"))
            .expect("numeric sentence becomes a question");
        assert!(numeric.question.contains(BLANK));
        assert!(!numeric.question.contains("70"));

        for q in questions.iter().filter(|q| q.question_type == QuestionType::Mcq) {
            let options = q.options.as_ref().unwrap();
            assert_eq!(options.len(), 4);
            let index = (q.correct_answer.as_bytes()[0] - b'A') as usize;
            assert!(index < 4);
            let answer = &options[index];
            assert!(q.explanation.as_ref().unwrap().contains(answer.as_str()));
        }
    }

    #[test]
    fn test_mcq_is_deterministic_for_a_seed() {
        let types = QuestionTypes {
            mcq: true,
            ..Default::default()
        };
        let a = generate_rule_based(TEXT, types, 3, &mut StdRng::seed_from_u64(42));
        let b = generate_rule_based(TEXT, types, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_true_false_negates_every_third() {
        let types = QuestionTypes {
            true_false: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let questions = generate_rule_based(TEXT, types, 4, &mut rng);
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].correct_answer, "False");
        assert!(questions[0].question.contains(" not "));
        assert!(questions[0]
            .explanation
            .as_ref()
            .unwrap()
            .starts_with("This statement is incorrect."));
        assert_eq!(questions[1].correct_answer, "True");
        assert_eq!(questions[2].correct_answer, "True");
        assert_eq!(questions[3].correct_answer, "False");
    }

    #[test]
    fn test_negate() {
        assert_eq!(
            negate("Water is wet").as_deref(),
            Some("Water is not wet")
        );
        assert_eq!(
            negate("Birds can fly").as_deref(),
            Some("Birds cannot fly")
        );
        assert_eq!(negate("Dogs bark loudly"), None);
        assert_eq!(negate("It is not here"), None);
    }

    #[test]
    fn test_negate_leaves_contractions_alone() {
        assert_eq!(negate("Most birds can't swim underwater"), None);
        assert_eq!(negate("Most birds can\u{2019}t swim underwater"), None);
        assert_eq!(negate("The result isn't final yet"), None);
    }

    #[test]
    fn test_negate_skips_other_negators() {
        assert_eq!(negate("Water is never solid at room heat"), None);
        assert_eq!(negate("There is no oxygen in space"), None);
        assert_eq!(negate("Plants have nothing to eat at night"), None);
    }

    #[test]
    fn test_negate_skips_leading_question_auxiliary() {
        assert_eq!(negate("Is this the main point of the text"), None);
        assert_eq!(negate("  Can plants grow without light"), None);
    }

    #[test]
    fn test_already_negative_statement_stays_true() {
        let q = build_true_false("Most birds can't swim underwater at all", true);
        assert_eq!(q.correct_answer, "True");
        assert_eq!(q.question, "True or False: Most birds can't swim underwater at all");
    }

    #[test]
    fn test_short_answer_uses_first_eight_words() {
        let types = QuestionTypes {
            short_answer: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let questions = generate_rule_based(TEXT, types, 1, &mut rng);
        assert_eq!(questions.len(), 1);
        assert!(questions[0].question.starts_with("Explain briefly: "));
        assert_eq!(questions[0].correct_answer.split_whitespace().count(), 8);
    }

    #[test]
    fn test_mixed_types_and_exact_count() {
        let mut rng = StdRng::seed_from_u64(9);
        let questions = generate_rule_based(TEXT, all_types(), 3, &mut rng);
        assert_eq!(questions.len(), 3);
        let kinds: Vec<QuestionType> = questions.iter().map(|q| q.question_type).collect();
        assert_eq!(
            kinds,
            vec![
                QuestionType::Mcq,
                QuestionType::TrueFalse,
                QuestionType::ShortAnswer
            ]
        );
    }

    #[test]
    fn test_no_key_sentences_gives_empty_quiz() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_rule_based("Hello. Hi.", all_types(), 5, &mut rng).is_empty());
    }

    #[test]
    fn test_parse_model_quiz_maps_answer_text_to_letter() {
        let output = r#"```json
{"questions": [
  {"question": "Capital of France?", "question_type": "multiple_choice",
   "options": ["Berlin", "Paris", "Rome", "Madrid"], "correct_answer": "Paris"},
  {"question": "The sky is green.", "type": "true_false", "correct_answer": "false"},
  {"question": "Unknown kind", "question_type": "essay", "correct_answer": "x"}
]}
```"#;
        let questions = parse_model_quiz(output, all_types(), 10);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer, "B");
        assert_eq!(questions[1].correct_answer, "False");
        assert_eq!(
            questions[1].options.as_deref(),
            Some(&["True".to_string(), "False".to_string()][..])
        );
    }

    #[test]
    fn test_parse_model_quiz_respects_types_and_limit() {
        let output = r#"[
          {"question": "Q1", "question_type": "short_answer", "correct_answer": "a"},
          {"question": "Q2", "question_type": "short_answer", "correct_answer": "b"},
          {"question": "Q3", "question_type": "mcq", "options": ["x", "y"], "correct_answer": "A"}
        ]"#;
        let only_short = QuestionTypes {
            short_answer: true,
            ..Default::default()
        };
        let questions = parse_model_quiz(output, only_short, 1);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Q1");
    }

    #[test]
    fn test_parse_model_quiz_garbage_is_empty() {
        assert!(parse_model_quiz("no json here", all_types(), 5).is_empty());
    }

    #[test]
    fn test_question_type_parse_is_lenient() {
        assert_eq!(QuestionType::parse("Multiple Choice"), Some(QuestionType::Mcq));
        assert_eq!(QuestionType::parse("true/false"), Some(QuestionType::TrueFalse));
        assert_eq!(QuestionType::parse("short-answer"), Some(QuestionType::ShortAnswer));
        assert_eq!(QuestionType::parse("essay"), None);
    }
}
