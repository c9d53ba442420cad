//! Mock speaker for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use recall_core::traits::Speaker;

/// One recorded call to [`Speaker::speak`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub language: String,
}

/// A speaker that records what it was asked to say instead of saying it.
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    /// Number of calls made.
    call_count: AtomicU32,
    utterances: Mutex<Vec<Utterance>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of calls made to this speaker.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Everything spoken so far, in order.
    pub fn utterances(&self) -> Vec<Utterance> {
        self.utterances
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }

    /// Texts spoken in `language`, in order.
    pub fn spoken_in(&self, language: &str) -> Vec<String> {
        self.utterances()
            .into_iter()
            .filter(|u| u.language == language)
            .map(|u| u.text)
            .collect()
    }

    pub fn last(&self) -> Option<Utterance> {
        self.utterances().pop()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str, language: &str) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut utterances) = self.utterances.lock() {
            utterances.push(Utterance {
                text: text.to_string(),
                language: language.to_string(),
            });
        }
    }
}
