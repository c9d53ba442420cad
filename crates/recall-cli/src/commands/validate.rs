//! The `recall validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = recall_core::bank::load_bank(&bank_path)?;

    println!(
        "Bank: {} ({} questions, language {})",
        bank_path.display(),
        bank.len(),
        bank.language
    );

    let warnings = recall_core::bank::validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .question
            .as_ref()
            .map(|q| format!("  [{q}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
