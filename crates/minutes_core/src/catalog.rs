//! Read-only issue catalog and attendee roster feeds.
//!
//! # Responsibility
//! - Load the exported issue list (`[{"number": .., "title": ..}]`).
//! - Filter the catalog for interactive selection.
//!
//! # Invariants
//! - Catalog order from the feed is preserved by every function here.
//! - Nothing in this module writes to the catalog source.

use crate::model::issue::{AttendeeTag, Issue, IssueNumber};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Roster used when no other roster is configured.
pub const DEFAULT_ROSTER: &[&str] = &[
    "@andybons",
    "@bradfitz",
    "@ianlancetaylor",
    "@rsc",
    "@spf13",
    "@griesemer",
];

const ISSUE_URL_BASE: &str = "https://golang.org/issue/";

static MODULE_WRAPPER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*export\s+const\s+[A-Za-z_$][A-Za-z0-9_$]*\s*=\s*")
        .expect("valid module wrapper regex")
});

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug)]
pub enum CatalogError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read issue catalog `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid issue catalog: {err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Parses catalog text.
///
/// Accepts a bare JSON array, or the same array wrapped as a JavaScript
/// module (`export const ISSUE_DATA = [...];`).
pub fn parse_catalog(text: &str) -> CatalogResult<Vec<Issue>> {
    let body = MODULE_WRAPPER_RE.replace(text, "");
    let body = body.trim().trim_end_matches(';');
    Ok(serde_json::from_str(body)?)
}

/// Reads and parses the catalog file at `path`.
pub fn load_catalog(path: impl AsRef<Path>) -> CatalogResult<Vec<Issue>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| {
        error!(
            "event=catalog_load module=catalog status=error path={} error_code=read_failed",
            path.display()
        );
        CatalogError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let issues = parse_catalog(&text)?;
    info!(
        "event=catalog_load module=catalog status=ok path={} issues={}",
        path.display(),
        issues.len()
    );
    Ok(issues)
}

/// Returns the issues whose title or number contains `query`.
///
/// Matching is case-insensitive. A blank query matches every issue.
pub fn filter_issues<'a>(catalog: &'a [Issue], query: &str) -> Vec<&'a Issue> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return catalog.iter().collect();
    }
    catalog
        .iter()
        .filter(|issue| {
            issue.title.to_lowercase().contains(&needle)
                || issue.number.to_string().contains(&needle)
        })
        .collect()
}

/// Looks up one issue by number.
pub fn find_issue(catalog: &[Issue], number: IssueNumber) -> Option<&Issue> {
    catalog.iter().find(|issue| issue.number == number)
}

/// Tracker link for an issue number.
pub fn issue_url(number: IssueNumber) -> String {
    format!("{ISSUE_URL_BASE}{number}")
}

pub fn default_roster() -> Vec<AttendeeTag> {
    DEFAULT_ROSTER.iter().map(|tag| tag.to_string()).collect()
}
