//! The `recall stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use recall_core::bank::load_bank;
use recall_core::store::{stats_path_for, JsonStatsStore};
use recall_core::traits::load_or_default;
use recall_core::QuestionStats;

use crate::config::load_config_from;

pub fn execute(bank_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = load_bank(&bank_path)?;
    let store = JsonStatsStore::new(stats_path_for(&bank_path, config.stats_dir.as_deref()));

    let mut record = load_or_default(&store);
    let reconciliation = record.reconcile(&bank);

    println!("Stats file: {}", store.path().display());
    println!(
        "Steps taken: {}    Points: {}    Questions: {}",
        record.step,
        record.points,
        record.question_stats.len()
    );
    if !reconciliation.added.is_empty() {
        println!("Never asked: {}", reconciliation.added.len());
    }

    let mut rows: Vec<(&String, &QuestionStats)> = record.question_stats.iter().collect();
    rows.sort_by(|a, b| a.1.cutoff().cmp(&b.1.cutoff()).then_with(|| a.0.cmp(b.0)));

    let mut table = Table::new();
    table.set_header(vec![
        "Question",
        "Answer",
        "Cutoff",
        "Points",
        "Last correct",
        "Last wrong",
        "Last correct at",
    ]);

    for (question, stats) in rows {
        table.add_row(vec![
            Cell::new(question),
            Cell::new(&stats.answer),
            Cell::new(stats.cutoff()),
            Cell::new(stats.question_points),
            Cell::new(step_label(stats.last_correct_step)),
            Cell::new(step_label(stats.last_wrong_step)),
            Cell::new(
                stats
                    .last_correct_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }

    println!("\n{table}");
    Ok(())
}

fn step_label(step: u64) -> String {
    if step == 0 {
        "never".to_string()
    } else {
        step.to_string()
    }
}
