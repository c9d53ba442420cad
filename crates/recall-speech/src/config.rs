//! Speech configuration and factory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use recall_core::traits::{NoopSpeaker, Speaker};

use crate::system::SystemSpeaker;
use crate::voices::{list_espeak_voices, list_say_voices, VoiceMap};

/// Which system command produces speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechBackend {
    /// macOS `say`.
    #[default]
    Say,
    /// `espeak-ng` (Linux and friends).
    Espeak,
    /// No speech at all.
    #[serde(alias = "none", alias = "off")]
    Silent,
}

impl SpeechBackend {
    pub fn default_command(self) -> &'static str {
        match self {
            SpeechBackend::Say => "say",
            SpeechBackend::Espeak => "espeak-ng",
            SpeechBackend::Silent => "",
        }
    }
}

/// The `[speech]` table of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Master switch.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub backend: SpeechBackend,
    /// Override the command name or path for the backend.
    #[serde(default)]
    pub command: Option<String>,
    /// Voice names never used, whatever the language.
    #[serde(default = "default_disabled_voices")]
    pub disabled_voices: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

/// Novelty English voices shipped with `say`.
fn default_disabled_voices() -> Vec<String> {
    [
        "Albert", "Bad News", "Bahh", "Bells", "Boing", "Bubbles", "Cellos", "Deranged", "Fred",
        "Good News", "Hysterical", "Junior", "Pipe Organ", "Princess", "Ralph", "Samantha",
        "Tessa", "Trinoids", "Whisper", "Zarvox",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            backend: SpeechBackend::default(),
            command: None,
            disabled_voices: default_disabled_voices(),
        }
    }
}

impl SpeechConfig {
    /// Configuration that never speaks.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.backend != SpeechBackend::Silent
    }

    pub fn command(&self) -> &str {
        self.command
            .as_deref()
            .unwrap_or_else(|| self.backend.default_command())
    }
}

/// List the voices the configured backend offers, minus disabled ones.
pub fn list_voices(config: &SpeechConfig) -> Result<VoiceMap> {
    let command = config.command();
    let voices = match config.backend {
        SpeechBackend::Say => list_say_voices(command),
        SpeechBackend::Espeak => list_espeak_voices(command),
        SpeechBackend::Silent => return Ok(VoiceMap::default()),
    }
    .with_context(|| format!("failed to list voices with `{command}`"))?;

    Ok(voices.without(&config.disabled_voices))
}

/// Create the speaker described by `config`.
///
/// Never fails: a backend that cannot be reached yields a silent speaker.
pub fn create_speaker(config: &SpeechConfig) -> Box<dyn Speaker> {
    if !config.is_active() {
        tracing::debug!("speech disabled");
        return Box::new(NoopSpeaker);
    }

    let voices = match list_voices(config) {
        Ok(voices) => voices,
        Err(e) => {
            let missing = e
                .downcast_ref::<crate::error::SpeechError>()
                .is_some_and(|se| se.is_permanent());
            if missing {
                tracing::debug!("{e:#}; speech disabled");
                return Box::new(NoopSpeaker);
            }
            tracing::debug!("{e:#}; speaking with default voices");
            VoiceMap::default()
        }
    };

    tracing::debug!(
        backend = ?config.backend,
        languages = voices.languages().count(),
        "speech ready"
    );
    Box::new(SystemSpeaker::new(config.backend, config.command(), voices))
}
