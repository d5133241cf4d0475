//! Tests for domain models.

use chrono::Utc;

use crate::db::models::*;

fn task(id: &str, status: TaskStatus, approved: bool) -> Task {
    let now = Utc::now();
    Task {
        id: id.to_string(),
        request_id: "req-1".to_string(),
        title: format!("Task {}", id),
        description: String::new(),
        status,
        approved,
        completed_details: None,
        created_at: now,
        updated_at: now,
        completed_at: None,
        approved_at: None,
    }
}

fn request(tasks: Vec<Task>) -> Request {
    let now = Utc::now();
    Request {
        id: "req-1".to_string(),
        original_request: "Ship the release".to_string(),
        split_details: None,
        status: RequestStatus::Pending,
        tasks,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn statuses_serialize_in_storage_format() {
    assert_eq!(
        serde_json::to_string(&TaskStatus::Pending).unwrap(),
        "\"PENDING\""
    );
    assert_eq!(serde_json::to_string(&TaskStatus::Done).unwrap(), "\"DONE\"");
    assert_eq!(
        serde_json::to_string(&RequestStatus::Completed).unwrap(),
        "\"COMPLETED\""
    );
}

#[test]
fn status_display_matches_from_str() {
    for status in [TaskStatus::Pending, TaskStatus::Done] {
        assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
    }
    for status in [RequestStatus::Pending, RequestStatus::Completed] {
        assert_eq!(
            status.to_string().parse::<RequestStatus>().unwrap(),
            status
        );
    }
}

#[test]
fn task_status_rejects_unknown_value() {
    let err = "in_progress".parse::<TaskStatus>().unwrap_err();
    assert_eq!(err, "Invalid TaskStatus: in_progress");
}

#[test]
fn task_serializes_with_camel_case_fields() {
    let json = serde_json::to_value(task("t1", TaskStatus::Done, false)).unwrap();
    assert_eq!(json["requestId"], "req-1");
    assert_eq!(json["status"], "DONE");
    assert!(json.get("completedDetails").is_some());
    assert!(json.get("request_id").is_none());
}

#[test]
fn request_counts_done_and_approved_tasks() {
    let req = request(vec![
        task("t1", TaskStatus::Done, true),
        task("t2", TaskStatus::Done, false),
        task("t3", TaskStatus::Pending, false),
    ]);

    assert_eq!(req.completed_count(), 2);
    assert_eq!(req.approved_count(), 1);
}

#[test]
fn request_task_lookup_by_id() {
    let mut req = request(vec![task("t1", TaskStatus::Pending, false)]);

    assert!(req.task("t1").is_some());
    assert!(req.task("nope").is_none());

    req.task_mut("t1").unwrap().title = "Renamed".to_string();
    assert_eq!(req.task("t1").unwrap().title, "Renamed");
}
