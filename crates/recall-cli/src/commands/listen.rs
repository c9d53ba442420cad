//! The `recall listen` command.

use std::io;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::Result;

use recall_core::listening::{run_listening, ListeningConfig};
use recall_core::traits::LineConsole;
use recall_speech::{create_speaker, SpeechConfig};

use crate::config::load_config_from;

pub fn execute(
    language: String,
    range: RangeInclusive<i64>,
    seed: Option<u64>,
    no_speak: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let speech = if no_speak {
        SpeechConfig::disabled()
    } else {
        config.speech
    };
    let speaker = create_speaker(&speech);

    let listening = ListeningConfig { language, range };
    let mut console = LineConsole::new(io::stdin().lock(), io::stdout().lock());
    let mut rng = super::make_rng(seed);

    run_listening(&listening, &mut console, speaker.as_ref(), &mut rng)?;
    Ok(())
}
