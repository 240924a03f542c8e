//! Runtime configuration for the minutes tool.
//!
//! Resolution order: built-in defaults, then `MINUTES_*` environment
//! variables. Front ends apply their own flags on top.

use crate::catalog::default_roster;
use crate::logging::default_log_level;
use crate::model::issue::AttendeeTag;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "MINUTES_DB_PATH";
pub const CATALOG_PATH_ENV: &str = "MINUTES_CATALOG_PATH";
pub const ROSTER_ENV: &str = "MINUTES_ROSTER";
pub const LOG_LEVEL_ENV: &str = "MINUTES_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "MINUTES_LOG_DIR";

const DB_FILE_NAME: &str = "minutes.sqlite3";
const CATALOG_FILE_NAME: &str = "issues.json";
const LOG_DIR_NAME: &str = "minutes_logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinutesConfig {
    pub db_path: PathBuf,
    pub catalog_path: PathBuf,
    pub roster: Vec<AttendeeTag>,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for MinutesConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            db_path: temp.join(DB_FILE_NAME),
            catalog_path: PathBuf::from(CATALOG_FILE_NAME),
            roster: default_roster(),
            log_level: default_log_level().to_string(),
            log_dir: temp.join(LOG_DIR_NAME),
        }
    }
}

impl MinutesConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// Blank values are ignored. An empty roster list keeps the default roster.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = read(CATALOG_PATH_ENV) {
            config.catalog_path = PathBuf::from(value);
        }
        if let Some(value) = read(ROSTER_ENV) {
            let roster = parse_roster(&value);
            if !roster.is_empty() {
                config.roster = roster;
            }
        }
        if let Some(value) = read(LOG_LEVEL_ENV) {
            config.log_level = value;
        }
        if let Some(value) = read(LOG_DIR_ENV) {
            config.log_dir = PathBuf::from(value);
        }
        config
    }
}

/// Splits a comma separated roster, dropping blanks and repeats.
pub fn parse_roster(raw: &str) -> Vec<AttendeeTag> {
    let mut roster: Vec<AttendeeTag> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        if !roster.iter().any(|known| known == tag) {
            roster.push(tag.to_string());
        }
    }
    roster
}
