//! Question bank loading and validation.
//!
//! Banks are JSON or TOML documents with a `language` tag and a
//! `questions` table mapping question text to answer text.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::RecallError;
use crate::model::QuestionBank;

/// Marks the spot in a question where the answer belongs.
pub const ANSWER_PLACEHOLDER: &str = "(?)";

/// On-disk bank formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankFormat {
    Json,
    Toml,
}

impl BankFormat {
    /// Guess the format from the file extension. Anything that is not
    /// `.toml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => BankFormat::Toml,
            _ => BankFormat::Json,
        }
    }
}

/// Load a question bank from a file. Empty banks are rejected.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    let bank = parse_bank_str(&content, BankFormat::from_path(path), path)?;
    if bank.is_empty() {
        return Err(RecallError::EmptyBank(path.to_path_buf()).into());
    }

    tracing::debug!(
        "loaded {} questions ({}) from {}",
        bank.len(),
        bank.language,
        path.display()
    );
    Ok(bank)
}

/// Parse bank text in the given format (useful for testing).
pub fn parse_bank_str(content: &str, format: BankFormat, source_path: &Path) -> Result<QuestionBank> {
    match format {
        BankFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display())),
        BankFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display())),
    }
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question concerned, if any.
    pub question: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a bank for entries that will drill badly.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.language.trim().is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "language tag is empty; answers cannot be voiced".into(),
        });
    }

    for (question, answer) in &bank.questions {
        if question.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: Some(question.clone()),
                message: "question text is blank".into(),
            });
        }

        if answer.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: Some(question.clone()),
                message: "answer is empty; only an empty response will be accepted".into(),
            });
        } else if answer.trim() != answer {
            warnings.push(ValidationWarning {
                question: Some(question.clone()),
                message: format!("answer {answer:?} has surrounding whitespace"),
            });
        }

        if question.matches(ANSWER_PLACEHOLDER).count() > 1 {
            warnings.push(ValidationWarning {
                question: Some(question.clone()),
                message: format!(
                    "more than one {ANSWER_PLACEHOLDER} placeholder; all will be voiced with the answer"
                ),
            });
        }
    }

    // Questions differing only by case or surrounding space look identical
    // when drilled.
    let mut seen = std::collections::HashMap::new();
    for question in bank.questions.keys() {
        let key = question.trim().to_lowercase();
        if let Some(first) = seen.insert(key, question) {
            warnings.push(ValidationWarning {
                question: Some(question.clone()),
                message: format!("looks like a duplicate of {first:?}"),
            });
        }
    }

    warnings
}

/// The text to voice after a question is graded.
///
/// For a question containing [`ANSWER_PLACEHOLDER`] this is the question
/// with the answer filled in and any remaining parenthesised hints removed,
/// so "yesterday they (?) walked (to have)" with answer "have" is voiced as
/// "yesterday they have walked". Otherwise it is the answer alone.
pub fn spoken_answer(question: &str, answer: &str) -> String {
    if !question.contains(ANSWER_PLACEHOLDER) {
        return answer.to_string();
    }
    let filled = question.replace(ANSWER_PLACEHOLDER, answer);
    let without_hints = strip_parenthesised(&filled);
    without_hints.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop every `(...)` group that has at least one char inside.
fn strip_parenthesised(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(open) = rest.find('(') {
        let after_open = &rest[open + 1..];
        match after_open.find(')') {
            Some(close) if close > 0 => {
                out.push_str(&rest[..open]);
                rest = &after_open[close + 1..];
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}
