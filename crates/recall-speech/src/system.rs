//! Speech through a system text-to-speech command (`say` or `espeak-ng`).

use std::cell::{Cell, RefCell};
use std::process::{Child, Command, Stdio};

use rand::seq::IndexedRandom;

use recall_core::traits::Speaker;

use crate::config::SpeechBackend;
use crate::error::SpeechError;
use crate::voices::VoiceMap;

/// Speaks by spawning a system command per utterance.
///
/// Playback is fire-and-forget: the child is never awaited. Children that
/// have exited are reaped at the start of the next utterance. Once the
/// command turns out to be missing the speaker goes quiet for good.
#[derive(Debug)]
pub struct SystemSpeaker {
    backend: SpeechBackend,
    command: String,
    voices: VoiceMap,
    children: RefCell<Vec<Child>>,
    unavailable: Cell<bool>,
}

impl SystemSpeaker {
    pub fn new(backend: SpeechBackend, command: impl Into<String>, voices: VoiceMap) -> Self {
        Self {
            backend,
            command: command.into(),
            voices,
            children: RefCell::new(Vec::new()),
            unavailable: Cell::new(false),
        }
    }

    /// Number of spawned utterances not yet reaped.
    pub fn pending(&self) -> usize {
        self.children.borrow().len()
    }

    /// Build the command line for one utterance.
    pub fn command_for(&self, text: &str, language: &str) -> Command {
        let mut cmd = Command::new(&self.command);
        match self.backend {
            SpeechBackend::Say => match self.pick_voice(language) {
                Ok(voice) => {
                    cmd.args(["-v", voice]);
                }
                Err(e) => tracing::debug!("{e}; using the system default voice"),
            },
            SpeechBackend::Espeak => {
                let voice = self
                    .voices
                    .voices_for(language)
                    .first()
                    .map(String::as_str)
                    .unwrap_or(language);
                cmd.args(["-v", voice]);
            }
            SpeechBackend::Silent => {}
        }
        cmd.arg(text);
        cmd
    }

    fn pick_voice(&self, language: &str) -> Result<&str, SpeechError> {
        self.voices
            .voices_for(language)
            .choose(&mut rand::rng())
            .map(String::as_str)
            .ok_or_else(|| SpeechError::NoVoice(language.to_string()))
    }

    fn reap(&self) {
        self.children
            .borrow_mut()
            .retain_mut(|child| !matches!(child.try_wait(), Ok(Some(_)) | Err(_)));
    }

    fn spawn(&self, text: &str, language: &str) -> Result<Child, SpeechError> {
        self.command_for(text, language)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::from_spawn(&self.command, e))
    }
}

impl Speaker for SystemSpeaker {
    fn speak(&self, text: &str, language: &str) {
        if self.unavailable.get() || self.backend == SpeechBackend::Silent {
            return;
        }
        self.reap();

        match self.spawn(text, language) {
            Ok(child) => self.children.borrow_mut().push(child),
            Err(e) => {
                tracing::debug!("speech skipped: {e}");
                if e.is_permanent() {
                    self.unavailable.set(true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn say_picks_a_voice_for_the_language() {
        let mut voices = VoiceMap::default();
        voices.insert("es", "Monica");
        let speaker = SystemSpeaker::new(SpeechBackend::Say, "say", voices);

        let cmd = speaker.command_for("hola", "es");
        assert_eq!(cmd.get_program(), "say");
        assert_eq!(args(&cmd), ["-v", "Monica", "hola"]);
    }

    #[test]
    fn say_without_voice_uses_default() {
        let speaker = SystemSpeaker::new(SpeechBackend::Say, "say", VoiceMap::default());
        assert_eq!(args(&speaker.command_for("bonjour", "fr")), ["bonjour"]);
    }

    #[test]
    fn espeak_falls_back_to_language_tag() {
        let speaker = SystemSpeaker::new(SpeechBackend::Espeak, "espeak-ng", VoiceMap::default());
        assert_eq!(
            args(&speaker.command_for("Hallo", "de")),
            ["-v", "de", "Hallo"]
        );

        let mut voices = VoiceMap::default();
        voices.insert("es", "es-419");
        let speaker = SystemSpeaker::new(SpeechBackend::Espeak, "espeak-ng", voices);
        assert_eq!(
            args(&speaker.command_for("hola", "es_MX")),
            ["-v", "es-419", "hola"]
        );
    }

    #[test]
    fn missing_command_goes_quiet() {
        let speaker = SystemSpeaker::new(
            SpeechBackend::Say,
            "recall-no-such-speech-binary",
            VoiceMap::default(),
        );
        speaker.speak("hello", "en");
        assert!(speaker.unavailable.get());
        speaker.speak("hello again", "en");
        assert_eq!(speaker.pending(), 0);
    }
}
