//! Selection aggregate: attendees, selected issue numbers and notes.
//!
//! # Invariants
//! - `notes` may contain numbers that are not in `selected_issues`; notes are
//!   never purged on deselection.
//! - A missing note and an empty note both render as "no note lines", but only
//!   the latter is stored.

use crate::model::issue::{AttendeeTag, IssueNumber};
use im::{OrdMap, OrdSet};

pub type AttendeeSet = OrdSet<AttendeeTag>;
pub type IssueSet = OrdSet<IssueNumber>;
pub type NoteMap = OrdMap<IssueNumber, String>;

/// Immutable view of the whole selection at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub attendees: AttendeeSet,
    pub selected_issues: IssueSet,
    pub notes: NoteMap,
}

impl SelectionSnapshot {
    /// Returns the note text for `number`, or `""` when none is stored.
    pub fn note_or_empty(&self, number: IssueNumber) -> &str {
        self.notes.get(&number).map_or("", String::as_str)
    }

    pub fn is_selected(&self, number: IssueNumber) -> bool {
        self.selected_issues.contains(&number)
    }

    pub fn is_attending(&self, tag: &str) -> bool {
        self.attendees.contains(tag)
    }
}
