//! Executes one parsed command against the selection database.
//!
//! Each invocation opens the database, applies at most one action, and
//! returns only after the store has flushed it.

use crate::cli::Command;
use chrono::Utc;
use log::{info, warn};
use minutes_core::catalog::issue_url;
use minutes_core::db::open_db;
use minutes_core::{
    filter_issues, load_catalog, render_minutes, Issue, MinutesConfig, SelectionStore,
    SqliteKvRepository,
};
use std::error::Error;
use std::io::{Read, Write};

pub type CommandResult = Result<(), Box<dyn Error>>;

pub fn run(
    command: Command,
    config: &MinutesConfig,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> CommandResult {
    let conn = open_db(&config.db_path)?;
    let mut store = SelectionStore::open_default(SqliteKvRepository::new(&conn))?;

    match command {
        Command::Attendees => {
            let attending = store.attendees();
            for tag in &config.roster {
                writeln!(out, "{} {tag}", mark(attending.contains(tag.as_str())))?;
            }
            for tag in attending.iter().filter(|tag| !config.roster.contains(*tag)) {
                writeln!(out, "{} {tag} (not in roster)", mark(true))?;
            }
        }
        Command::Attend { tags } => {
            for tag in tags {
                if !config.roster.contains(&tag) {
                    warn!("event=attend module=cli status=warn reason=not_in_roster");
                    writeln!(out, "note: {tag} is not in the roster")?;
                }
                store.add_attendee(tag)?;
            }
            print_attendees(out, &store)?;
        }
        Command::Unattend { tags } => {
            for tag in &tags {
                store.remove_attendee(tag)?;
            }
            print_attendees(out, &store)?;
        }
        Command::Issues { filter, selected } => {
            let catalog = load_catalog(&config.catalog_path)?;
            let snapshot = store.snapshot();
            let listed = filter_issues(&catalog, filter.as_deref().unwrap_or(""));
            for issue in listed
                .into_iter()
                .filter(|issue| !selected || snapshot.is_selected(issue.number))
            {
                write_issue_line(out, issue, snapshot.is_selected(issue.number))?;
            }
        }
        Command::Select { numbers } => {
            for number in numbers {
                store.add_selected_issue(number)?;
            }
            print_selected(out, &store)?;
        }
        Command::Deselect { numbers } => {
            for number in numbers {
                store.remove_selected_issue(number)?;
            }
            print_selected(out, &store)?;
        }
        Command::Note { number, text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    input.read_to_string(&mut buffer)?;
                    buffer
                }
            };
            store.set_note(number, text)?;
            if !store.snapshot().is_selected(number) {
                writeln!(out, "note saved for #{number} (issue is not selected)")?;
            } else {
                writeln!(out, "note saved for #{number}")?;
            }
        }
        Command::Generate { date } => {
            let catalog = load_catalog(&config.catalog_path)?;
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let minutes = render_minutes(&catalog, &store.snapshot(), date);
            out.write_all(minutes.as_bytes())?;
            info!("event=generate module=cli status=ok date={date}");
        }
        Command::Reset => {
            store.reset()?;
            writeln!(out, "selection cleared")?;
        }
    }

    Ok(())
}

fn mark(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn write_issue_line(out: &mut dyn Write, issue: &Issue, selected: bool) -> std::io::Result<()> {
    writeln!(
        out,
        "{} #{} {} <{}>",
        mark(selected),
        issue.number,
        issue.title,
        issue_url(issue.number)
    )
}

fn print_attendees(
    out: &mut dyn Write,
    store: &SelectionStore<SqliteKvRepository<'_>>,
) -> CommandResult {
    let attendees = store.attendees();
    let names = attendees.iter().map(String::as_str).collect::<Vec<_>>();
    writeln!(out, "attending: {}", names.join(", "))?;
    Ok(())
}

fn print_selected(
    out: &mut dyn Write,
    store: &SelectionStore<SqliteKvRepository<'_>>,
) -> CommandResult {
    let numbers = store
        .selected_issues()
        .iter()
        .map(|number| format!("#{number}"))
        .collect::<Vec<_>>();
    writeln!(out, "selected: {}", numbers.join(", "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::cli::Command;
    use minutes_core::MinutesConfig;
    use std::io::empty;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> MinutesConfig {
        let catalog_path = dir.path().join("issues.json");
        std::fs::write(
            &catalog_path,
            r#"[{"number":1,"title":"proposal: b thing"},{"number":2,"title":"a thing"}]"#,
        )
        .unwrap();
        MinutesConfig {
            db_path: dir.path().join("minutes.sqlite3"),
            catalog_path,
            ..MinutesConfig::default()
        }
    }

    fn exec(config: &MinutesConfig, command: Command) -> String {
        let mut out = Vec::new();
        run(command, config, &mut empty(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn actions_persist_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        exec(
            &config,
            Command::Attend {
                tags: vec!["@rsc".to_string(), "@andybons".to_string()],
            },
        );
        exec(&config, Command::Select { numbers: vec![1, 2] });
        exec(
            &config,
            Command::Note {
                number: 1,
                text: Some("agreed\n\n".to_string()),
            },
        );

        let date = chrono::NaiveDate::from_ymd_opt(2018, 4, 16);
        let minutes = exec(&config, Command::Generate { date });
        assert_eq!(
            minutes,
            "** 2018-04-16 / @andybons, @rsc **\n\n- #2 **a thing**\n- #1 **b thing**\n  - agreed\n"
        );
    }

    #[test]
    fn note_reads_stdin_when_text_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let mut out = Vec::new();
        let mut input: &[u8] = b"from stdin\n";

        run(
            Command::Note {
                number: 2,
                text: None,
            },
            &config,
            &mut input,
            &mut out,
        )
        .unwrap();

        assert!(String::from_utf8(out).unwrap().contains("not selected"));
        let minutes = exec(
            &config,
            Command::Generate {
                date: chrono::NaiveDate::from_ymd_opt(2018, 4, 16),
            },
        );
        assert!(!minutes.contains("from stdin"));
    }

    #[test]
    fn issues_listing_marks_selection_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        exec(&config, Command::Select { numbers: vec![2] });

        let listing = exec(
            &config,
            Command::Issues {
                filter: Some("THING".to_string()),
                selected: false,
            },
        );
        assert_eq!(
            listing,
            "[ ] #1 proposal: b thing <https://golang.org/issue/1>\n\
             [x] #2 a thing <https://golang.org/issue/2>\n"
        );

        let only_selected = exec(
            &config,
            Command::Issues {
                filter: None,
                selected: true,
            },
        );
        assert_eq!(only_selected.lines().count(), 1);
    }

    #[test]
    fn attendees_listing_flags_tags_outside_roster() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        exec(
            &config,
            Command::Attend {
                tags: vec!["@guest".to_string()],
            },
        );

        let listing = exec(&config, Command::Attendees);
        assert!(listing.contains("[ ] @rsc"));
        assert!(listing.contains("[x] @guest (not in roster)"));
    }

    #[test]
    fn reset_empties_the_minutes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        exec(&config, Command::Select { numbers: vec![1] });
        exec(&config, Command::Reset);

        let minutes = exec(
            &config,
            Command::Generate {
                date: chrono::NaiveDate::from_ymd_opt(2018, 4, 16),
            },
        );
        assert_eq!(minutes, "** 2018-04-16 /  **\n\n");
    }
}
