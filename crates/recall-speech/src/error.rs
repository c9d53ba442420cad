//! Speech error types.
//!
//! None of these reach the drill loop: the [`Speaker`](recall_core::traits::Speaker)
//! boundary logs and drops them. They exist so backends can decide whether
//! to keep trying.

use thiserror::Error;

/// Errors that can occur while producing speech.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The speech command could not be started at all.
    #[error("speech command `{command}` unavailable: {source}")]
    CommandUnavailable {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command started but the utterance could not be spawned.
    #[error("failed to spawn `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Listing the installed voices failed.
    #[error("failed to list voices: {0}")]
    VoiceListing(String),

    /// No installed voice speaks the requested language.
    #[error("no voice available for language {0:?}")]
    NoVoice(String),
}

impl SpeechError {
    /// Returns `true` if retrying later cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, SpeechError::CommandUnavailable { .. })
    }

    /// Classify an I/O error from spawning `command`.
    pub fn from_spawn(command: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            SpeechError::CommandUnavailable {
                command: command.to_string(),
                source,
            }
        } else {
            SpeechError::SpawnFailed {
                command: command.to_string(),
                source,
            }
        }
    }
}
