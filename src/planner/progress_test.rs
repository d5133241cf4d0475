//! Tests for progress rendering.

use super::input::NewTask;
use super::lifecycle;
use super::progress::{progress_fraction, render_table, tasks_progress};
use crate::db::TaskStatus;

fn request_with(titles: &[&str]) -> crate::db::Request {
    lifecycle::new_request(
        "Render progress".to_string(),
        None,
        titles
            .iter()
            .map(|t| NewTask {
                title: t.to_string(),
                description: String::new(),
            })
            .collect(),
    )
}

#[test]
fn table_has_header_and_one_row_per_task() {
    let mut request = request_with(&["First", "Second"]);
    let first = request.tasks[0].id.clone();
    lifecycle::mark_done(&mut request, &first, None).unwrap();
    lifecycle::approve_task(&mut request, &first).unwrap();

    let table = render_table(&request);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "| # | ID | Title | Status | Approved |");
    assert_eq!(lines[1], "|---|----|-------|--------|----------|");
    assert_eq!(
        lines[2],
        format!("| 1 | {} | First | ✅ | ✓ |", request.tasks[0].id)
    );
    assert_eq!(
        lines[3],
        format!("| 2 | {} | Second | ⏳ | ✗ |", request.tasks[1].id)
    );
}

#[test]
fn done_but_unapproved_task_shows_cross() {
    let mut request = request_with(&["Only"]);
    let id = request.tasks[0].id.clone();
    lifecycle::mark_done(&mut request, &id, None).unwrap();

    let table = render_table(&request);
    assert!(table.contains("| Only | ✅ | ✗ |"));
}

#[test]
fn pipes_and_newlines_stay_in_one_row() {
    let request = request_with(&["a | b\nc"]);

    let table = render_table(&request);
    assert_eq!(table.lines().count(), 3);
    assert!(table.contains("a \\| b c"));
}

#[test]
fn progress_lists_every_task_in_order() {
    let mut request = request_with(&["A", "B", "C"]);
    let b = request.tasks[1].id.clone();
    lifecycle::mark_done(&mut request, &b, None).unwrap();

    let progress = tasks_progress(&request);
    let titles: Vec<&str> = progress.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    assert_eq!(progress[1].status, TaskStatus::Done);
    assert!(!progress[1].approved);

    assert_eq!(progress_fraction(&request), "1/3");
}
