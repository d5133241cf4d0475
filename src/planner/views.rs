//! Result payloads returned by planner operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Id, Request, RequestStatus, Task};

use super::progress::{TaskProgress, progress_fraction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: Id,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningResult {
    pub message: String,
    pub request_id: Id,
    pub task_count: usize,
    pub tasks: Vec<TaskSummary>,
    pub progress_table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTaskResult {
    pub message: String,
    pub has_next_task: bool,
    pub all_tasks_done: bool,
    pub task: Option<Task>,
    pub tasks_progress: Vec<TaskProgress>,
    pub progress_table: String,
}

/// Result of an operation acting on a single task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub message: String,
    pub task: Task,
    pub tasks_progress: Vec<TaskProgress>,
    pub progress_table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCompletionResult {
    pub message: String,
    pub request: Request,
    pub tasks_progress: Vec<TaskProgress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTasksResult {
    pub message: String,
    pub added_tasks: Vec<Task>,
    pub tasks_progress: Vec<TaskProgress>,
    pub progress_table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskResult {
    pub message: String,
    pub deleted_task_id: Id,
    pub tasks_progress: Vec<TaskProgress>,
    pub progress_table: String,
}

/// One row of `list_requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: Id,
    pub original_request: String,
    pub split_details: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub task_count: usize,
    pub completed_count: usize,
    pub approved_count: usize,
    pub progress: String,
}

impl From<&Request> for RequestSummary {
    fn from(request: &Request) -> Self {
        Self {
            id: request.id.clone(),
            original_request: request.original_request.clone(),
            split_details: request.split_details.clone(),
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
            task_count: request.tasks.len(),
            completed_count: request.completed_count(),
            approved_count: request.approved_count(),
            progress: progress_fraction(request),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsResult {
    pub requests: Vec<RequestSummary>,
    pub total: usize,
}

/// Task fields plus the owning request's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    #[serde(flatten)]
    pub task: Task,
    pub original_request: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResult {
    pub message: String,
    pub removed_requests: usize,
}
