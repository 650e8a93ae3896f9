//! Runtime configuration for tracker executables.
//!
//! Values come from `CALORIE_*` environment variables; unset or blank
//! variables fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CALORIE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "CALORIE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CALORIE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "calorie.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TrackerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, keyed by the `*_ENV` names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TrackerConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn empty_lookup_yields_defaults() {
        let config = TrackerConfig::from_lookup(|_| None);
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.db_path, PathBuf::from("calorie.sqlite3"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn lookup_values_override_defaults_and_blanks_are_ignored() {
        let vars = HashMap::from([
            (DB_PATH_ENV, "/data/tracker.db"),
            (LOG_LEVEL_ENV, " warn "),
            (LOG_DIR_ENV, "   "),
        ]);
        let config = TrackerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.db_path, PathBuf::from("/data/tracker.db"));
        assert_eq!(config.log_level, "warn");
        assert!(config.log_dir.is_none());
    }
}
