//! recall-core — answer matching, adaptive scheduling, and the drill session.
//!
//! This crate holds the data model and all of the drill logic. Terminal I/O,
//! speech, and the stats file are reached only through the traits in
//! [`traits`].

pub mod bank;
pub mod engine;
pub mod error;
pub mod listening;
pub mod matcher;
pub mod model;
pub mod scheduler;
pub mod store;
pub mod traits;

pub use engine::{SessionConfig, SessionEngine, SessionSummary};
pub use error::RecallError;
pub use matcher::{grade, Grade};
pub use model::{QuestionBank, QuestionStats, StatsRecord};
pub use scheduler::{Scheduler, SelectionMode};
