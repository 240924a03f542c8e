use chrono::{NaiveDate, TimeZone, Utc};
use minutes_core::db::open_db_in_memory;
use minutes_core::{
    generate_minutes, render_minutes, Issue, SelectionSnapshot, SelectionStore,
    SqliteKvRepository,
};

fn meeting_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 4, 16).unwrap()
}

fn selection(attendees: &[&str], issues: &[u32], notes: &[(u32, &str)]) -> SelectionSnapshot {
    SelectionSnapshot {
        attendees: attendees.iter().map(|tag| tag.to_string()).collect(),
        selected_issues: issues.iter().copied().collect(),
        notes: notes
            .iter()
            .map(|(number, text)| (*number, text.to_string()))
            .collect(),
    }
}

#[test]
fn issues_are_ordered_by_normalized_title() {
    let catalog = vec![Issue::new(1, "proposal: b thing"), Issue::new(2, "a thing")];
    let out = render_minutes(&catalog, &selection(&[], &[1, 2], &[]), meeting_date());

    let first = out.find("#2").unwrap();
    let second = out.find("#1").unwrap();
    assert!(first < second);
    assert!(out.contains("- #1 **b thing**\n"));
}

#[test]
fn only_first_prefix_is_stripped() {
    let catalog = vec![Issue::new(5, "proposal: proposal: x")];
    let out = render_minutes(&catalog, &selection(&[], &[5], &[]), meeting_date());
    assert!(out.contains("- #5 **proposal: x**\n"));
}

#[test]
fn blank_note_lines_are_dropped() {
    let catalog = vec![Issue::new(8, "spec: tidy")];
    let out = render_minutes(
        &catalog,
        &selection(&[], &[8], &[(8, "  \nkeep\n\t\n")]),
        meeting_date(),
    );
    let note_lines = out
        .lines()
        .filter(|line| line.starts_with("  - "))
        .collect::<Vec<_>>();
    assert_eq!(note_lines, vec!["  - keep"]);
}

#[test]
fn crlf_note_lines_render_without_carriage_returns() {
    let catalog = vec![Issue::new(9, "windows notes")];
    let out = render_minutes(
        &catalog,
        &selection(&[], &[9], &[(9, "first\r\nsecond\r\n")]),
        meeting_date(),
    );
    assert!(out.ends_with("- #9 **windows notes**\n  - first\n  - second\n"));
    assert!(!out.contains('\r'));
}

#[test]
fn header_lists_attendees_in_byte_order() {
    let out = render_minutes(
        &[],
        &selection(&["@rsc", "@Zed", "@andybons"], &[], &[]),
        meeting_date(),
    );
    assert_eq!(out, "** 2018-04-16 / @Zed, @andybons, @rsc **\n\n");
}

#[test]
fn stale_reference_renders_header_only() {
    let catalog = vec![Issue::new(1, "present")];
    let out = render_minutes(&catalog, &selection(&["@rsc"], &[99], &[]), meeting_date());
    assert_eq!(out, "** 2018-04-16 / @rsc **\n\n");
}

#[test]
fn empty_selection_renders_header_and_blank_line() {
    let out = render_minutes(&[], &SelectionSnapshot::default(), meeting_date());
    assert_eq!(out, "** 2018-04-16 /  **\n\n");
}

#[test]
fn full_document_matches_template() {
    let catalog = vec![
        Issue::new(24543, "proposal: spec: non-cooperative goroutine preemption"),
        Issue::new(19308, "Proposal: cmd/go: *.go files in testdata"),
        Issue::new(20000, "unrelated"),
    ];
    let snapshot = selection(
        &["@rsc", "@bradfitz", "@andybons"],
        &[24543, 19308],
        &[
            (19308, "discussed\n\nwaiting on @rsc"),
            (20000, "not selected"),
        ],
    );

    let out = render_minutes(&catalog, &snapshot, meeting_date());
    assert_eq!(
        out,
        "** 2018-04-16 / @andybons, @bradfitz, @rsc **\n\
         \n\
         - #19308 **cmd/go: \\*.go files in testdata**\n\
         \x20 - discussed\n\
         \x20 - waiting on @rsc\n\
         - #24543 **spec: non-cooperative goroutine preemption**\n"
    );
}

#[test]
fn equal_titles_fall_back_to_issue_number() {
    let catalog = vec![
        Issue::new(30, "proposal: same"),
        Issue::new(10, "same"),
        Issue::new(20, "PROPOSAL: same"),
    ];
    let out = render_minutes(&catalog, &selection(&[], &[10, 20, 30], &[]), meeting_date());
    let order = out
        .lines()
        .filter(|line| line.starts_with("- #"))
        .collect::<Vec<_>>();
    assert_eq!(
        order,
        vec!["- #10 **same**", "- #20 **same**", "- #30 **same**"]
    );
}

#[test]
fn note_of_only_blank_lines_renders_no_note_lines() {
    let catalog = vec![Issue::new(4, "x")];
    let out = render_minutes(&catalog, &selection(&[], &[4], &[(4, "\n \n\t")]), meeting_date());
    assert!(out.ends_with("- #4 **x**\n"));
}

#[test]
fn generation_is_idempotent_and_uses_utc_date() {
    let catalog = vec![Issue::new(1, "a"), Issue::new(2, "b")];
    let snapshot = selection(&["@spf13"], &[1, 2], &[(1, "n")]);
    let now = Utc.with_ymd_and_hms(2018, 4, 16, 23, 59, 59).unwrap();

    let first = generate_minutes(&catalog, &snapshot, now);
    let second = generate_minutes(&catalog, &snapshot, now);
    assert_eq!(first, second);
    assert!(first.starts_with("** 2018-04-16 / @spf13 **\n\n"));
}

#[test]
fn catalog_titles_are_not_modified() {
    let catalog = vec![Issue::new(1, "proposal: keep me")];
    render_minutes(&catalog, &selection(&[], &[1], &[]), meeting_date());
    assert_eq!(catalog[0].title, "proposal: keep me");
}

#[test]
fn renders_latest_store_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SelectionStore::open_default(SqliteKvRepository::new(&conn)).unwrap();
    let catalog = vec![Issue::new(3, "three")];

    store.add_selected_issue(3).unwrap();
    let before = render_minutes(&catalog, &store.snapshot(), meeting_date());
    store.set_note(3, "follow up").unwrap();
    let after = render_minutes(&catalog, &store.snapshot(), meeting_date());

    assert!(!before.contains("follow up"));
    assert!(after.ends_with("- #3 **three**\n  - follow up\n"));
}
