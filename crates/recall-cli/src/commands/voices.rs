//! The `recall voices` command.

use std::path::PathBuf;

use anyhow::Result;

use crate::config::load_config_from;

pub fn execute(language: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    if !config.speech.is_active() {
        println!("Speech is disabled.");
        return Ok(());
    }

    let voices = recall_speech::list_voices(&config.speech)?;
    let mut found_any = false;

    match &language {
        Some(language) => {
            let names = voices.voices_for(language);
            if !names.is_empty() {
                found_any = true;
                println!("{language}: {}", names.join(", "));
            }
        }
        None => {
            for (language, names) in voices.languages() {
                found_any = true;
                println!("{language}: {}", names.join(", "));
            }
        }
    }

    if !found_any {
        println!(
            "No voices found for `{}`. Install voices or change [speech] in recall.toml.",
            config.speech.command()
        );
    }

    Ok(())
}
