//! Stats persistence: a JSON file per question bank, plus an in-memory
//! store for tests and dry runs.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::RecallError;
use crate::model::StatsRecord;
use crate::traits::StatsStore;

/// Suffix appended to the bank's file name to name its stats file.
pub const STATS_SUFFIX: &str = ".stats";

/// Where the stats of the bank at `bank_path` live.
///
/// By default the stats sit next to the bank (`spanish.json` →
/// `spanish.json.stats`). With `stats_dir`, the same file name is placed in
/// that directory instead.
pub fn stats_path_for(bank_path: &Path, stats_dir: Option<&Path>) -> PathBuf {
    let mut file_name = bank_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "questions".into());
    file_name.push(STATS_SUFFIX);

    match stats_dir {
        Some(dir) => dir.join(file_name),
        None => bank_path.with_file_name(file_name),
    }
}

/// Stats stored as a pretty-printed JSON document, rewritten whole on save.
#[derive(Debug, Clone)]
pub struct JsonStatsStore {
    path: PathBuf,
}

impl JsonStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonStatsStore {
    fn load(&self) -> Result<Option<StatsRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read stats from {}", self.path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse stats JSON: {}", self.path.display()))?;
        Ok(Some(record))
    }

    fn save(&self, record: &StatsRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record).context("failed to serialize stats")?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RecallError::StatsWrite {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, json).map_err(|source| RecallError::StatsWrite {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the record in memory. Can be told to fail saves.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    record: RefCell<Option<StatsRecord>>,
    saves: Cell<u32>,
    fail_saves: bool,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out holding `record`.
    pub fn with_record(record: StatsRecord) -> Self {
        Self {
            record: RefCell::new(Some(record)),
            ..Self::default()
        }
    }

    /// A store whose every save fails.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// The last successfully saved (or initial) record.
    pub fn record(&self) -> Option<StatsRecord> {
        self.record.borrow().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> Result<Option<StatsRecord>> {
        Ok(self.record.borrow().clone())
    }

    fn save(&self, record: &StatsRecord) -> Result<()> {
        if self.fail_saves {
            return Err(RecallError::StatsWrite {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("save refused"),
            }
            .into());
        }
        *self.record.borrow_mut() = Some(record.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionStats;
    use crate::traits::load_or_default;
    use chrono::{TimeZone, Utc};

    fn sample_record() -> StatsRecord {
        let mut record = StatsRecord {
            points: 7,
            step: 12,
            ..Default::default()
        };
        record.question_stats.insert(
            "el café".into(),
            QuestionStats {
                answer: "coffee".into(),
                last_correct_step: 11,
                last_wrong_step: 4,
                question_points: 2,
                last_correct_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()),
            },
        );
        record
            .question_stats
            .insert("hola".into(), QuestionStats::with_answer("hello"));
        record
    }

    #[test]
    fn stats_path_next_to_bank() {
        assert_eq!(
            stats_path_for(Path::new("banks/spanish.json"), None),
            PathBuf::from("banks/spanish.json.stats")
        );
    }

    #[test]
    fn stats_path_in_stats_dir() {
        assert_eq!(
            stats_path_for(Path::new("banks/spanish.json"), Some(Path::new("/var/recall"))),
            PathBuf::from("/var/recall/spanish.json.stats")
        );
    }

    #[test]
    fn json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(dir.path().join("bank.json.stats"));

        let record = sample_record();
        store.save(&record).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn json_store_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(dir.path().join("absent.stats"));
        assert!(store.load().unwrap().is_none());
        assert_eq!(load_or_default(&store), StatsRecord::default());
    }

    #[test]
    fn json_store_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.json.stats");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonStatsStore::new(&path);
        assert!(store.load().is_err());
        assert_eq!(load_or_default(&store), StatsRecord::default());
    }

    #[test]
    fn json_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(dir.path().join("nested/deeper/bank.json.stats"));
        store.save(&StatsRecord::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn json_store_save_failure_is_stats_write() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();

        let err = JsonStatsStore::new(&path)
            .save(&StatsRecord::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecallError>(),
            Some(RecallError::StatsWrite { .. })
        ));
    }

    #[test]
    fn memory_store_counts_saves() {
        let store = MemoryStatsStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample_record()).unwrap();
        store.save(&sample_record()).unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.record(), Some(sample_record()));

        let failing = MemoryStatsStore::failing();
        assert!(failing.save(&sample_record()).is_err());
        assert_eq!(failing.save_count(), 0);
    }
}
