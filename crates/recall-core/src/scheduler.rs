//! Next-question selection.
//!
//! Smart mode draws a random threshold between the lowest and highest
//! cutoff and picks uniformly among the questions at or below it. Questions
//! with a low cutoff qualify for almost every threshold and so come up more
//! often; well-known questions only qualify for the rare high draws.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RecallError;
use crate::model::QuestionStats;

/// How the next question is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Cutoff-based weighted sampling.
    #[default]
    Smart,
    /// Uniform sampling, ignoring history.
    Random,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Smart => write!(f, "smart"),
            SelectionMode::Random => write!(f, "random"),
        }
    }
}

impl FromStr for SelectionMode {
    type Err = RecallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "smart" => Ok(SelectionMode::Smart),
            "random" => Ok(SelectionMode::Random),
            other => Err(RecallError::InvalidMode(other.to_string())),
        }
    }
}

/// Cutoff range and candidate pool of one smart draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw<'a> {
    pub min_cutoff: i64,
    pub max_cutoff: i64,
    pub threshold: i64,
    /// Questions whose cutoff is at or below the threshold.
    pub pool: Vec<&'a str>,
}

/// Stateless question picker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler {
    mode: SelectionMode,
}

impl Scheduler {
    pub fn new(mode: SelectionMode) -> Self {
        Self { mode }
    }

    /// Pick the next question. Returns `None` only when `stats` is empty.
    pub fn select<'a, R: Rng>(
        &self,
        stats: &'a BTreeMap<String, QuestionStats>,
        rng: &mut R,
    ) -> Option<&'a str> {
        match self.mode {
            SelectionMode::Smart => {
                let draw = draw_pool(stats, rng)?;
                draw.pool.choose(rng).copied()
            }
            SelectionMode::Random => {
                let questions: Vec<&str> = stats.keys().map(String::as_str).collect();
                questions.choose(rng).copied()
            }
        }
    }
}

/// Run steps 1–4 of smart selection: cutoffs, range, threshold, pool.
///
/// The question holding the minimum cutoff always qualifies, so the pool of
/// a non-empty map is never empty. Equal and negative bounds are ordinary
/// inputs to the inclusive threshold draw.
pub fn draw_pool<'a, R: Rng>(
    stats: &'a BTreeMap<String, QuestionStats>,
    rng: &mut R,
) -> Option<Draw<'a>> {
    let cutoffs: Vec<(&str, i64)> = stats
        .iter()
        .map(|(question, s)| (question.as_str(), s.cutoff()))
        .collect();

    let min_cutoff = cutoffs.iter().map(|(_, c)| *c).min()?;
    let max_cutoff = cutoffs.iter().map(|(_, c)| *c).max()?;
    let threshold = rng.random_range(min_cutoff..=max_cutoff);

    let pool = cutoffs
        .into_iter()
        .filter(|(_, cutoff)| *cutoff <= threshold)
        .map(|(question, _)| question)
        .collect();

    Some(Draw {
        min_cutoff,
        max_cutoff,
        threshold,
        pool,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn stats_with(entries: &[(&str, u64, u64, i64)]) -> BTreeMap<String, QuestionStats> {
        entries
            .iter()
            .map(|&(q, correct, wrong, points)| {
                (
                    q.to_string(),
                    QuestionStats {
                        answer: format!("{q}-answer"),
                        last_correct_step: correct,
                        last_wrong_step: wrong,
                        question_points: points,
                        last_correct_at: None,
                    },
                )
            })
            .collect()
    }

    fn cold(n: usize) -> BTreeMap<String, QuestionStats> {
        (0..n)
            .map(|i| (format!("q{i}"), QuestionStats::with_answer(format!("a{i}"))))
            .collect()
    }

    #[test]
    fn mode_display_and_parse() {
        assert_eq!(SelectionMode::Smart.to_string(), "smart");
        assert_eq!("random".parse::<SelectionMode>().unwrap(), SelectionMode::Random);
        assert_eq!(" SMART ".parse::<SelectionMode>().unwrap(), SelectionMode::Smart);
        assert!(matches!(
            "clever".parse::<SelectionMode>(),
            Err(RecallError::InvalidMode(m)) if m == "clever"
        ));
        assert_eq!(SelectionMode::default(), SelectionMode::Smart);
    }

    #[test]
    fn empty_stats_select_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let stats = BTreeMap::new();
        assert!(Scheduler::new(SelectionMode::Smart).select(&stats, &mut rng).is_none());
        assert!(Scheduler::new(SelectionMode::Random).select(&stats, &mut rng).is_none());
        assert!(draw_pool(&stats, &mut rng).is_none());
    }

    #[test]
    fn pool_always_holds_the_minimum() {
        let stats = stats_with(&[
            ("known", 40, 2, 9),
            ("shaky", 30, 29, 1),
            ("missed", 0, 35, -3),
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let draw = draw_pool(&stats, &mut rng).unwrap();
            assert!(draw.pool.contains(&"missed"));
            assert!((draw.min_cutoff..=draw.max_cutoff).contains(&draw.threshold));
        }
    }

    #[test]
    fn equal_negative_cutoffs_pool_everything() {
        // cutoff = 0 + (0 - 0) - 2 for both
        let stats = stats_with(&[("a", 0, 0, -2), ("b", 0, 0, -2)]);
        let mut rng = StdRng::seed_from_u64(3);
        let draw = draw_pool(&stats, &mut rng).unwrap();
        assert_eq!(draw.min_cutoff, -2);
        assert_eq!(draw.max_cutoff, -2);
        assert_eq!(draw.threshold, -2);
        assert_eq!(draw.pool, vec!["a", "b"]);
    }

    #[test]
    fn weak_questions_come_up_more_often() {
        let stats = stats_with(&[("known", 50, 1, 10), ("missed", 0, 48, -4)]);
        let scheduler = Scheduler::new(SelectionMode::Smart);
        let mut rng = StdRng::seed_from_u64(11);

        let mut missed = 0;
        for _ in 0..2_000 {
            if scheduler.select(&stats, &mut rng) == Some("missed") {
                missed += 1;
            }
        }
        // "known" only enters the pool when the threshold hits its cutoff
        // exactly, and then wins half the time.
        assert!(missed > 1_900, "missed selected {missed} times");
    }

    /// Pearson chi-square statistic against a uniform expectation.
    fn chi_square(counts: &HashMap<&str, u32>, categories: usize, trials: u32) -> f64 {
        let expected = f64::from(trials) / categories as f64;
        counts
            .values()
            .map(|&observed| {
                let diff = f64::from(observed) - expected;
                diff * diff / expected
            })
            .sum()
    }

    fn assert_uniform(mode: SelectionMode, seed: u64) {
        const TRIALS: u32 = 20_000;
        let stats = cold(8);
        let scheduler = Scheduler::new(mode);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut counts: HashMap<&str, u32> = HashMap::new();
        for _ in 0..TRIALS {
            let q = scheduler.select(&stats, &mut rng).unwrap();
            *counts.entry(q).or_default() += 1;
        }

        assert_eq!(counts.len(), 8, "every question should be drawn");
        let chi2 = chi_square(&counts, 8, TRIALS);
        // Critical value for 7 degrees of freedom at p = 0.001.
        assert!(chi2 < 24.32, "{mode} selection not uniform: chi2 = {chi2:.2}");
    }

    #[test]
    fn cold_start_smart_selection_is_uniform() {
        assert_uniform(SelectionMode::Smart, 42);
    }

    #[test]
    fn random_mode_is_uniform() {
        assert_uniform(SelectionMode::Random, 4242);
    }

    #[test]
    fn random_mode_ignores_history() {
        let stats = stats_with(&[("known", 50, 1, 10), ("missed", 0, 48, -4)]);
        let scheduler = Scheduler::new(SelectionMode::Random);
        let mut rng = StdRng::seed_from_u64(5);

        let known = (0..2_000)
            .filter(|_| scheduler.select(&stats, &mut rng) == Some("known"))
            .count();
        assert!((800..1_200).contains(&known), "known selected {known} times");
    }
}
