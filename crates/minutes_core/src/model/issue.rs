//! Issue catalog record and attendee identifiers.

use serde::{Deserialize, Serialize};

/// Tracker number of an issue. Unique and positive within a catalog.
pub type IssueNumber = u32;

/// Opaque attendee handle such as `@rsc`. Compared as a plain string.
pub type AttendeeTag = String;

/// One entry of the external issue catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: IssueNumber,
    pub title: String,
}

impl Issue {
    pub fn new(number: IssueNumber, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
        }
    }
}
