//! Core data model types for recall.
//!
//! A [`QuestionBank`] is the immutable source of questions for a run. The
//! [`StatsRecord`] is what survives between runs: the session counters plus
//! one [`QuestionStats`] per question, keyed by question text.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The questions of one drill, mapping question text to canonical answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Language tag of the answers (e.g. "es"). Used to voice answers.
    #[serde(default = "default_language")]
    pub language: String,
    /// Question text → canonical answer text.
    #[serde(default)]
    pub questions: BTreeMap<String, String>,
}

fn default_language() -> String {
    "en".to_string()
}

impl QuestionBank {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            questions: BTreeMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests and sample banks.
    pub fn with_question(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.questions.insert(question.into(), answer.into());
        self
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Per-question history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionStats {
    /// Canonical answer, synced from the bank on load.
    #[serde(default)]
    pub answer: String,
    /// Cycle number of the most recent correct grading; 0 if never.
    #[serde(default)]
    pub last_correct_step: u64,
    /// Cycle number of the most recent wrong grading; 0 if never.
    #[serde(default)]
    pub last_wrong_step: u64,
    /// +1 per correct cycle, -1 per cycle whose first attempt was wrong.
    #[serde(default)]
    pub question_points: i64,
    /// When the question was last answered correctly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_correct_at: Option<DateTime<Utc>>,
}

impl QuestionStats {
    pub fn with_answer(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            ..Default::default()
        }
    }

    /// Selection cutoff. A lower cutoff means a higher chance of selection.
    ///
    /// The cutoff grows with how recently the question was answered
    /// correctly, with the gap between the last correct and the last wrong
    /// answer, and with the accumulated points.
    pub fn cutoff(&self) -> i64 {
        // Saturates so that hand-edited or extreme stats cannot overflow.
        let correct = i64::try_from(self.last_correct_step).unwrap_or(i64::MAX);
        let wrong = i64::try_from(self.last_wrong_step).unwrap_or(i64::MAX);
        correct
            .saturating_add(correct.saturating_sub(wrong))
            .saturating_add(self.question_points)
    }
}

/// Everything persisted between runs of one question bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    /// Running points total across all runs.
    #[serde(default)]
    pub points: i64,
    /// Number of resolved cycles across all runs.
    #[serde(default)]
    pub step: u64,
    /// Per-question history keyed by question text.
    #[serde(default)]
    pub question_stats: BTreeMap<String, QuestionStats>,
}

/// What [`StatsRecord::reconcile`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Questions new to the record.
    pub added: Vec<String>,
    /// Questions dropped because the bank no longer has them.
    pub removed: Vec<String>,
    /// Questions whose canonical answer changed in the bank.
    pub answer_changed: Vec<String>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.answer_changed.is_empty()
    }
}

impl StatsRecord {
    /// Bring the per-question stats in line with `bank`.
    ///
    /// Afterwards there is exactly one entry per bank question, each carrying
    /// the bank's answer. New questions start from zeroed stats.
    pub fn reconcile(&mut self, bank: &QuestionBank) -> Reconciliation {
        let mut report = Reconciliation::default();

        for (question, answer) in &bank.questions {
            match self.question_stats.get_mut(question) {
                Some(stats) => {
                    if stats.answer != *answer {
                        if !stats.answer.is_empty() {
                            report.answer_changed.push(question.clone());
                        }
                        stats.answer = answer.clone();
                    }
                }
                None => {
                    self.question_stats
                        .insert(question.clone(), QuestionStats::with_answer(answer.clone()));
                    report.added.push(question.clone());
                }
            }
        }

        self.question_stats.retain(|question, _| {
            let keep = bank.questions.contains_key(question);
            if !keep {
                report.removed.push(question.clone());
            }
            keep
        });

        if !report.is_noop() {
            tracing::info!(
                added = report.added.len(),
                removed = report.removed.len(),
                answer_changed = report.answer_changed.len(),
                "reconciled stats with question bank"
            );
        }

        report
    }

    /// Smallest cutoff across all questions, if there are any.
    pub fn min_cutoff(&self) -> Option<i64> {
        self.question_stats.values().map(QuestionStats::cutoff).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(correct: u64, wrong: u64, points: i64) -> QuestionStats {
        QuestionStats {
            answer: "x".into(),
            last_correct_step: correct,
            last_wrong_step: wrong,
            question_points: points,
            last_correct_at: None,
        }
    }

    #[test]
    fn cutoff_of_fresh_question_is_zero() {
        assert_eq!(QuestionStats::default().cutoff(), 0);
    }

    #[test]
    fn cutoff_formula() {
        // 10 + (10 - 4) + 3
        assert_eq!(stats(10, 4, 3).cutoff(), 19);
        // recently wrong, never right: 0 + (0 - 7) - 2
        assert_eq!(stats(0, 7, -2).cutoff(), -9);
    }

    #[test]
    fn reconcile_adds_and_prunes() {
        let mut record = StatsRecord::default();
        record
            .question_stats
            .insert("gone".into(), stats(3, 1, 2));
        record.question_stats.insert("hola".into(), stats(5, 2, 1));

        let bank = QuestionBank::new("es")
            .with_question("hola", "hello")
            .with_question("adiós", "goodbye");

        let report = record.reconcile(&bank);

        assert_eq!(report.added, vec!["adiós".to_string()]);
        assert_eq!(report.removed, vec!["gone".to_string()]);
        assert_eq!(report.answer_changed, vec!["hola".to_string()]);

        let keys: Vec<&str> = record.question_stats.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["adiós", "hola"]);

        // Existing history survives, the answer follows the bank.
        let hola = &record.question_stats["hola"];
        assert_eq!(hola.answer, "hello");
        assert_eq!(hola.last_correct_step, 5);
        assert_eq!(hola.question_points, 1);

        assert_eq!(record.question_stats["adiós"], QuestionStats::with_answer("goodbye"));
    }

    #[test]
    fn cutoff_saturates_on_extreme_values() {
        let stats = QuestionStats {
            last_correct_step: u64::MAX,
            question_points: i64::MAX,
            ..QuestionStats::with_answer("hello")
        };
        assert_eq!(stats.cutoff(), i64::MAX);

        let stats = QuestionStats {
            last_wrong_step: u64::MAX,
            question_points: i64::MIN,
            ..QuestionStats::with_answer("hello")
        };
        assert_eq!(stats.cutoff(), i64::MIN);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let bank = QuestionBank::new("de").with_question("eins", "one");
        let mut record = StatsRecord::default();
        assert!(!record.reconcile(&bank).is_noop());
        assert!(record.reconcile(&bank).is_noop());
    }

    #[test]
    fn record_defaults_missing_fields() {
        let record: StatsRecord =
            serde_json::from_str(r#"{"question_stats": {"hola": {"answer": "hello"}}}"#).unwrap();
        assert_eq!(record.points, 0);
        assert_eq!(record.step, 0);
        assert_eq!(record.question_stats["hola"].question_points, 0);
        assert!(record.question_stats["hola"].last_correct_at.is_none());
    }

    #[test]
    fn bank_language_defaults_to_english() {
        let bank: QuestionBank = serde_json::from_str(r#"{"questions": {"a": "b"}}"#).unwrap();
        assert_eq!(bank.language, "en");
        assert_eq!(bank.len(), 1);
    }
}
