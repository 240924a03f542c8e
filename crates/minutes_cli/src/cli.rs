//! Command-line surface of the `minutes` tool.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use minutes_core::{IssueNumber, MinutesConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "minutes",
    version,
    about = "Pick attendees and issues, keep notes, and print meeting minutes."
)]
pub struct Cli {
    /// Selection database file. Overrides MINUTES_DB_PATH.
    #[arg(long = "db", global = true)]
    pub db_path: Option<PathBuf>,

    /// Issue catalog JSON file. Overrides MINUTES_CATALOG_PATH.
    #[arg(long = "catalog", global = true)]
    pub catalog_path: Option<PathBuf>,

    /// Absolute directory for log files. Overrides MINUTES_LOG_DIR.
    #[arg(long = "log-dir", global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error. Overrides MINUTES_LOG_LEVEL.
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the roster and mark who is attending.
    Attendees,
    /// Mark one or more roster members as attending.
    Attend {
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove one or more attendees.
    Unattend {
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// List catalog issues and mark the selected ones.
    Issues {
        /// Case-insensitive match against title or number.
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Only show selected issues.
        #[arg(long)]
        selected: bool,
    },
    /// Select issues for the minutes.
    Select {
        #[arg(required = true)]
        numbers: Vec<IssueNumber>,
    },
    /// Deselect issues. Their notes are kept.
    Deselect {
        #[arg(required = true)]
        numbers: Vec<IssueNumber>,
    },
    /// Set the note for an issue. Reads stdin when TEXT is omitted.
    Note {
        number: IssueNumber,
        text: Option<String>,
    },
    /// Print the minutes document.
    Generate {
        /// Meeting date (YYYY-MM-DD). Defaults to today in UTC.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete all stored attendees, selections and notes.
    Reset,
}

impl Cli {
    /// Applies command-line overrides on top of `base`.
    pub fn apply_overrides(&self, mut base: MinutesConfig) -> MinutesConfig {
        if let Some(path) = &self.db_path {
            base.db_path = path.clone();
        }
        if let Some(path) = &self.catalog_path {
            base.catalog_path = path.clone();
        }
        if let Some(dir) = &self.log_dir {
            base.log_dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            base.log_level = level.clone();
        }
        base
    }
}
