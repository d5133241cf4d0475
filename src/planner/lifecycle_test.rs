//! Tests for request and task state transitions.

use super::PlannerError;
use super::input::NewTask;
use super::lifecycle::*;
use crate::db::{Request, RequestStatus, TaskStatus};

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: format!("{} description", title),
    }
}

fn two_task_request() -> Request {
    new_request(
        "Two step job".to_string(),
        Some("by phase".to_string()),
        vec![new_task("T1"), new_task("T2")],
    )
}

#[test]
fn new_request_is_pending_with_linked_tasks() {
    let request = two_task_request();

    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.tasks.len(), 2);
    for task in &request.tasks {
        assert_eq!(task.request_id, request.id);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.approved);
        assert!(task.completed_at.is_none());
    }
    assert_ne!(request.tasks[0].id, request.tasks[1].id);
}

#[test]
fn mark_done_sets_completion_fields() {
    let mut request = two_task_request();
    let id = request.tasks[0].id.clone();

    let task = mark_done(&mut request, &id, Some("shipped".to_string())).unwrap();

    assert_eq!(task.status, TaskStatus::Done);
    assert_eq!(task.completed_details.as_deref(), Some("shipped"));
    assert!(task.completed_at.is_some());
    assert_eq!(request.task(&id).unwrap().status, TaskStatus::Done);
}

#[test]
fn mark_done_twice_is_invalid_state() {
    let mut request = two_task_request();
    let id = request.tasks[0].id.clone();
    mark_done(&mut request, &id, None).unwrap();

    let err = mark_done(&mut request, &id, None).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidState { .. }));
}

#[test]
fn unknown_task_is_not_found() {
    let mut request = two_task_request();

    let err = mark_done(&mut request, "missing", None).unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));
}

#[test]
fn approval_requires_done() {
    let mut request = two_task_request();
    let id = request.tasks[0].id.clone();

    let err = approve_task(&mut request, &id).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidState { .. }));
    assert!(!request.tasks[0].approved);
}

#[test]
fn second_approval_fails() {
    let mut request = two_task_request();
    let id = request.tasks[0].id.clone();
    mark_done(&mut request, &id, None).unwrap();
    approve_task(&mut request, &id).unwrap();

    let err = approve_task(&mut request, &id).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidState { .. }));
    assert!(err.to_string().contains("already approved"));
}

#[test]
fn complete_request_lists_outstanding_tasks() {
    let mut request = two_task_request();
    let t1 = request.tasks[0].id.clone();
    mark_done(&mut request, &t1, None).unwrap();

    let err = complete_request(&mut request).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'T1'"), "got: {}", message);
    assert!(message.contains("not approved"));
    assert!(message.contains("'T2'"));
    assert!(message.contains("not done"));
    assert_eq!(request.status, RequestStatus::Pending);
}

#[test]
fn complete_request_after_all_approved() {
    let mut request = two_task_request();
    for id in task_ids(&request.tasks) {
        mark_done(&mut request, &id, None).unwrap();
        approve_task(&mut request, &id).unwrap();
    }

    assert!(all_tasks_approved(&request));
    complete_request(&mut request).unwrap();
    assert_eq!(request.status, RequestStatus::Completed);

    let err = complete_request(&mut request).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidState { .. }));
}

#[test]
fn next_pending_skips_done_and_follows_appends() {
    let mut request = two_task_request();
    let t1 = request.tasks[0].id.clone();
    let t2 = request.tasks[1].id.clone();

    assert_eq!(next_pending(&request).unwrap().id, t1);
    mark_done(&mut request, &t1, None).unwrap();
    assert_eq!(next_pending(&request).unwrap().id, t2);
    mark_done(&mut request, &t2, None).unwrap();
    assert!(next_pending(&request).is_none());

    let added = append_tasks(&mut request, vec![new_task("T3")]).unwrap();
    assert_eq!(next_pending(&request).unwrap().id, added[0].id);
}

#[test]
fn append_to_completed_request_fails() {
    let mut request = new_request(String::new(), None, vec![new_task("Only")]);
    let id = request.tasks[0].id.clone();
    mark_done(&mut request, &id, None).unwrap();
    approve_task(&mut request, &id).unwrap();
    complete_request(&mut request).unwrap();

    let err = append_tasks(&mut request, vec![new_task("Late")]).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidState { .. }));
    assert_eq!(request.tasks.len(), 1);
}

#[test]
fn edit_task_rules() {
    let mut request = two_task_request();
    let t1 = request.tasks[0].id.clone();
    let t2 = request.tasks[1].id.clone();

    let err = edit_task(&mut request, &t1, None, None).unwrap_err();
    assert!(matches!(err, PlannerError::Validation { .. }));

    let err = edit_task(&mut request, &t1, Some(" ".to_string()), None).unwrap_err();
    assert!(matches!(err, PlannerError::Validation { .. }));

    let edited = edit_task(&mut request, &t1, None, Some("new text".to_string())).unwrap();
    assert_eq!(edited.title, "T1");
    assert_eq!(edited.description, "new text");

    mark_done(&mut request, &t2, None).unwrap();
    let err = edit_task(&mut request, &t2, Some("Renamed".to_string()), None).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidState { .. }));
}

#[test]
fn remove_task_rules() {
    let mut request = two_task_request();
    let t1 = request.tasks[0].id.clone();
    let t2 = request.tasks[1].id.clone();

    mark_done(&mut request, &t1, None).unwrap();
    let err = remove_task(&mut request, &t1).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidState { .. }));

    let removed = remove_task(&mut request, &t2).unwrap();
    assert_eq!(removed.id, t2);
    assert_eq!(request.tasks.len(), 1);

    let err = remove_task(&mut request, "missing").unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));
}

#[test]
fn last_task_cannot_be_removed() {
    let mut request = new_request("x".to_string(), None, vec![new_task("Only")]);
    let id = request.tasks[0].id.clone();

    let err = remove_task(&mut request, &id).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidState { .. }));
    assert_eq!(request.tasks.len(), 1);
}
