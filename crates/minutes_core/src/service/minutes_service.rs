//! Minutes document rendering.
//!
//! # Responsibility
//! - Turn a catalog plus a selection snapshot into the minutes text.
//!
//! # Invariants
//! - Pure: the same catalog, snapshot and date always give the same bytes.
//! - Issues are ordered by normalized title, then by number.
//! - Selected numbers missing from the catalog are skipped silently.
//! - Catalog titles are never modified; normalization is applied to copies.

use crate::model::issue::Issue;
use crate::model::selection::{AttendeeSet, SelectionSnapshot};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static PROPOSAL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^proposal: ").expect("valid proposal prefix regex"));

/// Renders the minutes for `now`, using its UTC calendar date.
pub fn generate_minutes(
    catalog: &[Issue],
    selection: &SelectionSnapshot,
    now: DateTime<Utc>,
) -> String {
    render_minutes(catalog, selection, now.date_naive())
}

/// Renders the minutes for an explicit meeting date.
pub fn render_minutes(catalog: &[Issue], selection: &SelectionSnapshot, date: NaiveDate) -> String {
    let mut selected = catalog
        .iter()
        .filter(|issue| selection.is_selected(issue.number))
        .map(|issue| (normalize_title(&issue.title), issue))
        .collect::<Vec<_>>();
    selected.sort_by(|(left_title, left), (right_title, right)| {
        left_title
            .cmp(right_title)
            .then(left.number.cmp(&right.number))
    });

    let mut out = render_header(date, &selection.attendees);
    out.push('\n');
    for (title, issue) in &selected {
        render_issue_block(&mut out, issue, title, selection.note_or_empty(issue.number));
    }

    debug!(
        "event=minutes_render module=minutes status=ok selected={} rendered={} bytes={}",
        selection.selected_issues.len(),
        selected.len(),
        out.len()
    );
    out
}

/// Formats `** YYYY-MM-DD / @a, @b **` with its trailing newline.
pub fn render_header(date: NaiveDate, attendees: &AttendeeSet) -> String {
    // `OrdSet` iterates in byte order, which is the required attendee order.
    let names = attendees.iter().map(String::as_str).collect::<Vec<_>>();
    format!("** {} / {} **\n", date.format("%Y-%m-%d"), names.join(", "))
}

/// Drops one leading `proposal: ` (any case) from `title`.
pub fn normalize_title(title: &str) -> Cow<'_, str> {
    PROPOSAL_PREFIX_RE.replace(title, "")
}

/// Escapes only the first `*` so it does not close the bold markers early.
pub fn escape_first_asterisk(title: &str) -> Cow<'_, str> {
    if title.contains('*') {
        Cow::Owned(title.replacen('*', "\\*", 1))
    } else {
        Cow::Borrowed(title)
    }
}

/// Yields the note lines that carry any non-whitespace text.
pub fn note_lines(note: &str) -> impl Iterator<Item = &str> {
    note.lines().filter(|line| !line.trim().is_empty())
}

fn render_issue_block(out: &mut String, issue: &Issue, title: &str, note: &str) {
    out.push_str(&format!(
        "- #{} **{}**\n",
        issue.number,
        escape_first_asterisk(title)
    ));
    for line in note_lines(note) {
        out.push_str(&format!("  - {line}\n"));
    }
}
