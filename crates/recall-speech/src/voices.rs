//! Installed voices, grouped by language.

use std::collections::BTreeMap;
use std::process::{Command, Stdio};

use crate::error::SpeechError;

/// Voice names keyed by two-letter language code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceMap {
    by_language: BTreeMap<String, Vec<String>>,
}

impl VoiceMap {
    /// Parse the output of `say -v ?`.
    ///
    /// Each line reads `<name> <locale> # <sample sentence>`, where the name
    /// may itself contain spaces, e.g.
    /// `Bad News            en_US    # The light you see at the end...`.
    pub fn parse_say_listing(output: &str) -> Self {
        let mut map = VoiceMap::default();

        for line in output.lines() {
            let description = line.split('#').next().unwrap_or_default();
            let mut tokens: Vec<&str> = description.split_whitespace().collect();
            let Some(locale) = tokens.pop() else {
                continue;
            };
            if tokens.is_empty() {
                continue;
            }
            let Some(language) = language_of(locale) else {
                continue;
            };
            map.insert(&language, tokens.join(" "));
        }

        map
    }

    /// Parse the output of `espeak-ng --voices`.
    ///
    /// The first line is a header; the rest are columns
    /// `Pty Language Age/Gender VoiceName File [Other Languages]`.
    /// The language column is what `-v` accepts, so that is what gets stored.
    pub fn parse_espeak_listing(output: &str) -> Self {
        let mut map = VoiceMap::default();

        for line in output.lines().skip(1) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 4 {
                continue;
            }
            let Some(language) = language_of(tokens[1]) else {
                continue;
            };
            map.insert(&language, tokens[1]);
        }

        map
    }

    pub fn insert(&mut self, language: &str, voice: impl Into<String>) {
        self.by_language
            .entry(language.to_lowercase())
            .or_default()
            .push(voice.into());
    }

    /// Drop every voice whose name is in `disabled` (case-insensitive).
    pub fn without(mut self, disabled: &[String]) -> Self {
        for voices in self.by_language.values_mut() {
            voices.retain(|v| !disabled.iter().any(|d| d.eq_ignore_ascii_case(v)));
        }
        self.by_language.retain(|_, voices| !voices.is_empty());
        self
    }

    /// Voices for a language tag such as `es`, `es_ES`, or `es-MX`.
    pub fn voices_for(&self, language: &str) -> &[String] {
        language_of(language)
            .and_then(|l| self.by_language.get(&l))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn languages(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_language
            .iter()
            .map(|(l, v)| (l.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.by_language.is_empty()
    }
}

/// Two-letter language code of a locale or language tag.
pub(crate) fn language_of(tag: &str) -> Option<String> {
    let code = tag.split(['_', '-']).next()?;
    if code.len() >= 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code[..2].to_ascii_lowercase())
    } else {
        None
    }
}

/// Run `command` with `args` and return its stdout.
fn capture(command: &str, args: &[&str]) -> Result<String, SpeechError> {
    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| SpeechError::from_spawn(command, e))?;

    if !output.status.success() {
        return Err(SpeechError::VoiceListing(format!(
            "`{command} {}` exited with {}",
            args.join(" "),
            output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run `<command> -v ?` and parse the voice listing.
pub fn list_say_voices(command: &str) -> Result<VoiceMap, SpeechError> {
    capture(command, &["-v", "?"]).map(|out| VoiceMap::parse_say_listing(&out))
}

/// Run `<command> --voices` and parse the voice listing.
pub fn list_espeak_voices(command: &str) -> Result<VoiceMap, SpeechError> {
    capture(command, &["--voices"]).map(|out| VoiceMap::parse_espeak_listing(&out))
}
