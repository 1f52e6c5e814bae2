use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;

/// Upper bound for the idle timeout of an unfinished entry, one week
const MAX_SESSION_TIMEOUT_SECS: u64 = 7 * 24 * 3600;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// SQLite file, defaults to `budget.db` in the user's data directory
    pub(crate) database: Option<PathBuf>,
    /// Where report charts are written
    pub(crate) chart_dir: PathBuf,
    /// Seconds an unfinished entry waits for its next answer
    pub(crate) session_timeout_secs: u64,
    pub(crate) greeting: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: None,
            chart_dir: PathBuf::from("charts"),
            session_timeout_secs: 600,
            greeting: "Hi, this is the family budget tracker!".to_string(),
        }
    }
}

impl Config {
    /// Read a TOML config file. A missing file means all defaults.
    pub(crate) fn load_from_file(path: &Path) -> Result<Config> {
        if path.exists() && path.is_file() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Unable to read config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    pub(crate) fn database_path(&self) -> PathBuf {
        match &self.database {
            Some(path) => path.clone(),
            None => default_database_path(),
        }
    }

    pub(crate) fn session_timeout(&self) -> Duration {
        Duration::seconds(self.session_timeout_secs.min(MAX_SESSION_TIMEOUT_SECS) as i64)
    }
}

fn default_database_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("budgetbot").join("budget.db"),
        None => PathBuf::from("budget.db"),
    }
}
