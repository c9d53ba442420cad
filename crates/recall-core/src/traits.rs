//! Collaborator traits the drill engine talks to.
//!
//! The engine never touches stdin, the filesystem, or an audio device
//! directly. Line I/O goes through [`Console`], persistence through
//! [`StatsStore`], and voice output through [`Speaker`], so the whole loop can
//! run against in-memory doubles.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::model::StatsRecord;

// ---------------------------------------------------------------------------
// Line I/O
// ---------------------------------------------------------------------------

/// Result of waiting for one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line, without its trailing newline.
    Line(String),
    /// The input stream is closed. This is how a session ends.
    EndOfInput,
}

/// Line-oriented user interaction.
pub trait Console {
    /// Block until one line arrives or the input closes.
    fn read_line(&mut self) -> io::Result<ReadOutcome>;

    /// Write one line of output.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// [`Console`] over any buffered reader and writer.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect captured output in tests.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self) -> io::Result<ReadOutcome> {
        // Invalid UTF-8 is replaced rather than rejected; it will simply
        // grade as wrong.
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(ReadOutcome::EndOfInput);
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Ok(ReadOutcome::Line(String::from_utf8_lossy(line).into_owned()))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")?;
        self.output.flush()
    }
}

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

/// Fire-and-forget voice output.
///
/// Implementations must not block until playback ends and must not report
/// failure to the caller; a missing voice or backend is silently tolerated.
pub trait Speaker {
    fn speak(&self, text: &str, language: &str);
}

/// Speaker that says nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpeaker;

impl Speaker for NoopSpeaker {
    fn speak(&self, _: &str, _: &str) {}
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Durable storage for one bank's [`StatsRecord`].
pub trait StatsStore {
    /// Load the stored record. `Ok(None)` means nothing has been stored yet;
    /// an error means the stored data is unreadable or corrupt.
    fn load(&self) -> Result<Option<StatsRecord>>;

    /// Replace the stored record with `record`.
    fn save(&self, record: &StatsRecord) -> Result<()>;

    /// Human-readable location, for messages.
    fn describe(&self) -> String;
}

/// Load a record, falling back to the empty default when the store is
/// empty or its contents cannot be used.
pub fn load_or_default(store: &dyn StatsStore) -> StatsRecord {
    match store.load() {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::debug!("no stats at {}, starting fresh", store.describe());
            StatsRecord::default()
        }
        Err(e) => {
            tracing::warn!(
                "ignoring unusable stats at {}: {e:#}",
                store.describe()
            );
            StatsRecord::default()
        }
    }
}
