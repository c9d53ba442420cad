//! Configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use recall_core::SelectionMode;
use recall_speech::SpeechConfig;

/// Top-level recall configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallConfig {
    /// Selection mode used when `--mode` is not given.
    #[serde(default)]
    pub default_mode: SelectionMode,
    /// Language the questions are voiced in.
    #[serde(default = "default_prompt_language")]
    pub prompt_language: String,
    /// Print per-question stats after each answer.
    #[serde(default)]
    pub show_stats: bool,
    /// Directory for stats files. Defaults to next to each bank.
    #[serde(default)]
    pub stats_dir: Option<PathBuf>,
    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_prompt_language() -> String {
    "en".to_string()
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            default_mode: SelectionMode::default(),
            prompt_language: default_prompt_language(),
            show_stats: false,
            stats_dir: None,
            speech: SpeechConfig::default(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `recall.toml` in the current directory
/// 2. `~/.config/recall/config.toml`
///
/// Environment variable overrides: `RECALL_NOSPEAK`, `RECALL_SHOW_STATS`.
pub fn load_config_from(path: Option<&Path>) -> Result<RecallConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("recall.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<RecallConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RecallConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var_os(name).is_some());
    Ok(config)
}

fn apply_env_overrides(config: &mut RecallConfig, is_set: impl Fn(&str) -> bool) {
    if is_set("RECALL_NOSPEAK") {
        config.speech.enabled = false;
    }
    if is_set("RECALL_SHOW_STATS") {
        config.show_stats = true;
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("recall"))
}
