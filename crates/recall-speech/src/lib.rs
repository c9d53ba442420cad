//! recall-speech — text-to-speech backends.
//!
//! Implements the [`Speaker`](recall_core::traits::Speaker) trait on top of
//! the system `say` and `espeak-ng` commands, plus a recording mock for tests.

pub mod config;
pub mod error;
pub mod mock;
pub mod system;
pub mod voices;

pub use config::{create_speaker, list_voices, SpeechBackend, SpeechConfig};
pub use error::SpeechError;
pub use recall_core::traits::NoopSpeaker;
