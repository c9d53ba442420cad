//! Core error types.
//!
//! Most fallible glue in this crate returns `anyhow::Result`; these variants
//! exist for the failures callers need to tell apart without string matching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the drill core.
#[derive(Debug, Error)]
pub enum RecallError {
    /// The requested selection mode is not one of the supported modes.
    #[error("invalid mode: {0} (expected \"smart\" or \"random\")")]
    InvalidMode(String),

    /// The question bank loaded fine but contains no questions.
    #[error("question bank has no questions: {}", .0.display())]
    EmptyBank(PathBuf),

    /// Writing the stats record failed. Session progress since the last
    /// successful save may be lost.
    #[error("failed to save stats to {}: {source}", path.display())]
    StatsWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
