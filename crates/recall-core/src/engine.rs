//! The drill session: ask, grade, repeat until right, advance, persist.
//!
//! One *cycle* presents a scheduled question until it is answered
//! correctly. Only the first grading of a cycle moves the session points;
//! the question's own stats take a -1 on a wrong first attempt and a +1 when
//! the cycle finally resolves. The step counter advances once per resolved
//! cycle, after which the record is saved.

use std::fmt;

use anyhow::{anyhow, Result};
use chrono::Utc;
use rand::Rng;

use crate::bank::spoken_answer;
use crate::matcher::{grade, Grade};
use crate::model::{QuestionBank, QuestionStats, Reconciliation, StatsRecord};
use crate::scheduler::{Scheduler, SelectionMode};
use crate::traits::{load_or_default, Console, ReadOutcome, Speaker, StatsStore};

/// Configuration for a drill session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How the next question is picked.
    pub mode: SelectionMode,
    /// Language tag used to voice the questions.
    pub prompt_language: String,
    /// Print the question's new cutoff and points after each cycle.
    pub show_stats: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Smart,
            prompt_language: "en".to_string(),
            show_stats: false,
        }
    }
}

/// Session counters plus the per-question stats they travel with.
#[derive(Debug, Clone)]
pub struct SessionState {
    record: StatsRecord,
    initial_step: u64,
    initial_points: i64,
}

impl SessionState {
    /// Reconcile `record` with `bank` and snapshot the starting counters.
    pub fn start(mut record: StatsRecord, bank: &QuestionBank) -> (Self, Reconciliation) {
        let reconciliation = record.reconcile(bank);
        let state = Self {
            initial_step: record.step,
            initial_points: record.points,
            record,
        };
        (state, reconciliation)
    }

    pub fn record(&self) -> &StatsRecord {
        &self.record
    }

    pub fn step(&self) -> u64 {
        self.record.step
    }

    pub fn points(&self) -> i64 {
        self.record.points
    }

    pub fn question(&self, question: &str) -> Option<&QuestionStats> {
        self.record.question_stats.get(question)
    }

    /// Number of the cycle in progress. Steps count from 1 so that 0 can
    /// mean "never" in the per-question history.
    pub fn current_cycle(&self) -> u64 {
        self.record.step.saturating_add(1)
    }

    /// Apply the first grading of a cycle.
    pub fn apply_first_grading(&mut self, question: &str, grade: Grade) {
        let cycle = self.current_cycle();
        let Some(stats) = self.record.question_stats.get_mut(question) else {
            tracing::warn!("graded unknown question {question:?}");
            return;
        };

        if grade.is_correct() {
            stats.question_points = stats.question_points.saturating_add(1);
            stats.last_correct_step = cycle;
            stats.last_correct_at = Some(Utc::now());
            self.record.points = self.record.points.saturating_add(1);
        } else {
            stats.question_points = stats.question_points.saturating_sub(1);
            stats.last_wrong_step = cycle;
            self.record.points = self.record.points.saturating_sub(1);
        }
    }

    /// Apply the correct retry that ends a cycle whose first attempt was
    /// wrong. Session points are left alone.
    pub fn apply_retry_success(&mut self, question: &str) {
        let cycle = self.current_cycle();
        if let Some(stats) = self.record.question_stats.get_mut(question) {
            stats.question_points = stats.question_points.saturating_add(1);
            stats.last_correct_step = cycle;
            stats.last_correct_at = Some(Utc::now());
        }
    }

    /// Close the cycle. Returns the new step.
    pub fn resolve_cycle(&mut self) -> u64 {
        self.record.step = self.current_cycle();
        self.record.step
    }

    /// What this run has achieved so far.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            questions_taken: self.record.step.saturating_sub(self.initial_step),
            points_made: self.record.points.saturating_sub(self.initial_points),
        }
    }
}

/// Result of one run, shown at exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub questions_taken: u64,
    pub points_made: i64,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let taken = self.questions_taken as usize;
        let stars = self.points_made.max(0) as usize;
        writeln!(
            f,
            "{}",
            format!("Questions taken: {} {}", self.questions_taken, "✱ ".repeat(taken)).trim_end()
        )?;
        write!(
            f,
            "{}",
            format!("Points made: {} {}", self.points_made, "☆ ".repeat(stars)).trim_end()
        )
    }
}

/// The score announcement voiced at exit, in the bank's language.
pub fn score_phrase(language: &str, points: i64) -> String {
    match language.get(..2).unwrap_or(language) {
        "es" => format!("la puntuación: {points}"),
        "de" => format!("Die Punktzahl: {points}"),
        _ => format!("Score: {points}"),
    }
}

/// How a call to [`SessionEngine::run_cycle`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The question was eventually answered correctly.
    Resolved {
        question: String,
        first_grade: Grade,
        attempts: u32,
    },
    /// Input ended; the cycle, if started, is abandoned unsaved.
    Exit,
}

/// Drives a drill session over a question bank.
pub struct SessionEngine<'a, R> {
    language: String,
    state: SessionState,
    scheduler: Scheduler,
    store: &'a dyn StatsStore,
    speaker: &'a dyn Speaker,
    config: SessionConfig,
    rng: R,
}

impl<'a, R: Rng> SessionEngine<'a, R> {
    /// Load the stored record (or the empty default) and reconcile it with
    /// `bank`.
    pub fn new(
        bank: &QuestionBank,
        store: &'a dyn StatsStore,
        speaker: &'a dyn Speaker,
        config: SessionConfig,
        rng: R,
    ) -> Self {
        let (state, _) = SessionState::start(load_or_default(store), bank);
        Self {
            language: bank.language.clone(),
            state,
            scheduler: Scheduler::new(config.mode),
            store,
            speaker,
            config,
            rng,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run cycles until input ends, then print and voice the summary.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<SessionSummary> {
        while let CycleOutcome::Resolved { .. } = self.run_cycle(console)? {}

        let summary = self.state.summary();
        console.write_line("")?;
        for line in summary.to_string().lines() {
            console.write_line(line)?;
        }
        self.speaker
            .speak(&score_phrase(&self.language, summary.points_made), &self.language);
        console.write_line("")?;
        console.write_line("Goodbye.")?;
        Ok(summary)
    }

    /// Schedule one question and keep asking it until it is answered
    /// correctly or input ends.
    pub fn run_cycle(&mut self, console: &mut dyn Console) -> Result<CycleOutcome> {
        let question = self
            .scheduler
            .select(&self.state.record.question_stats, &mut self.rng)
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("no questions to ask"))?;
        let answer = self
            .state
            .question(&question)
            .map(|s| s.answer.clone())
            .unwrap_or_default();

        let Some(first_grade) = self.ask(console, &question, &answer)? else {
            return Ok(CycleOutcome::Exit);
        };
        self.state.apply_first_grading(&question, first_grade);
        let mut attempts = 1;

        if !first_grade.is_correct() {
            loop {
                let Some(retry) = self.ask(console, &question, &answer)? else {
                    return Ok(CycleOutcome::Exit);
                };
                attempts += 1;
                if retry.is_correct() {
                    self.state.apply_retry_success(&question);
                    break;
                }
            }
        }

        console.write_line("")?;
        let step = self.state.resolve_cycle();
        tracing::debug!(step, attempts, %first_grade, "cycle resolved: {question}");

        if self.config.show_stats {
            self.print_question_stats(console, &question)?;
        }
        self.persist(console)?;

        Ok(CycleOutcome::Resolved {
            question,
            first_grade,
            attempts,
        })
    }

    /// Present the question once. `None` means input ended.
    fn ask(&self, console: &mut dyn Console, question: &str, answer: &str) -> Result<Option<Grade>> {
        console.write_line(&format!("{question}:"))?;
        self.speaker.speak(question, &self.config.prompt_language);

        let input = match console.read_line()? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::EndOfInput => return Ok(None),
        };

        let result = grade(&input, answer);
        match result {
            Grade::Exact => console.write_line("CORRECT!")?,
            Grade::AccentEquivalent => console.write_line(&format!("Almost correct: \"{answer}\""))?,
            Grade::Wrong => {
                console.write_line(&format!("Wrong!\tThe correct answer is:\t'{answer}'"))?
            }
        }

        self.speaker
            .speak(&spoken_answer(question, answer), &self.language);
        Ok(Some(result))
    }

    fn print_question_stats(&self, console: &mut dyn Console, question: &str) -> Result<()> {
        let Some(stats) = self.state.question(question) else {
            return Ok(());
        };
        let min = self.state.record.min_cutoff().unwrap_or(0);
        console.write_line(&format!(
            "▹ {:>30}: {}",
            "Question new cutoff",
            stats.cutoff().saturating_sub(min)
        ))?;
        console.write_line(&format!(
            "▹ {:>30}: {}",
            "Question new points", stats.question_points
        ))?;
        Ok(())
    }

    /// Save the record. A failed save is reported and the session goes on.
    fn persist(&self, console: &mut dyn Console) -> Result<()> {
        match self.store.save(&self.state.record) {
            Ok(()) => tracing::debug!("stats saved to {}", self.store.describe()),
            Err(e) => {
                tracing::error!("stats save failed: {e:#}");
                console.write_line(&format!(
                    "Warning: progress not saved ({e:#}); the session continues."
                ))?;
            }
        }
        Ok(())
    }
}
