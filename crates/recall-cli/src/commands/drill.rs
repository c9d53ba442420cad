//! The `recall drill` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use recall_core::bank::load_bank;
use recall_core::store::{stats_path_for, JsonStatsStore};
use recall_core::traits::LineConsole;
use recall_core::{SelectionMode, SessionConfig, SessionEngine};
use recall_speech::{create_speaker, SpeechConfig};

use crate::config::load_config_from;

pub struct DrillArgs {
    pub bank: PathBuf,
    pub mode: Option<String>,
    pub no_speak: bool,
    pub show_stats: bool,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
}

pub fn execute(args: DrillArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    // Flags win over the config file.
    let mode = match &args.mode {
        Some(mode) => mode.parse::<SelectionMode>()?,
        None => config.default_mode,
    };
    let speech = if args.no_speak {
        SpeechConfig::disabled()
    } else {
        config.speech.clone()
    };

    let bank = load_bank(&args.bank)?;
    let store = JsonStatsStore::new(stats_path_for(&args.bank, config.stats_dir.as_deref()));
    let speaker = create_speaker(&speech);

    tracing::info!(
        bank = %args.bank.display(),
        questions = bank.len(),
        %mode,
        stats = %store.path().display(),
        "starting drill"
    );

    let session = SessionConfig {
        mode,
        prompt_language: config.prompt_language.clone(),
        show_stats: args.show_stats || config.show_stats,
    };
    let mut engine = SessionEngine::new(
        &bank,
        &store,
        speaker.as_ref(),
        session,
        super::make_rng(args.seed),
    );

    let mut console = LineConsole::new(io::stdin().lock(), io::stdout().lock());
    engine.run(&mut console)?;

    Ok(())
}
