//! Read-only request and task views.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::db::{Database, DbError, Request, RequestRepository, Task};
use crate::planner::progress::progress_fraction;

use super::{ErrorResponse, status_for};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[schema(example = "3f0e9c1a-5b7d-4c2e-9a8f-1d2b3c4d5e6f")]
    pub id: String,
    pub request_id: String,
    #[schema(example = "Write the parser")]
    pub title: String,
    pub description: String,
    #[schema(example = "PENDING")]
    pub status: String,
    pub approved: bool,
    pub completed_details: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
    pub approved_at: Option<String>,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            request_id: t.request_id,
            title: t.title,
            description: t.description,
            status: t.status.to_string(),
            approved: t.approved,
            completed_details: t.completed_details,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
            completed_at: t.completed_at.map(|ts| ts.to_rfc3339()),
            approved_at: t.approved_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub id: String,
    #[schema(example = "Build a CLI todo app")]
    pub original_request: String,
    pub split_details: Option<String>,
    #[schema(example = "PENDING")]
    pub status: String,
    /// Completed tasks over total, e.g. "1/3"
    #[schema(example = "1/3")]
    pub progress: String,
    pub tasks: Vec<TaskResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Request> for RequestResponse {
    fn from(r: Request) -> Self {
        Self {
            progress: progress_fraction(&r),
            id: r.id,
            original_request: r.original_request,
            split_details: r.split_details,
            status: r.status.to_string(),
            tasks: r.tasks.into_iter().map(TaskResponse::from).collect(),
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct RequestList {
    pub items: Vec<RequestResponse>,
    pub total: usize,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailsResponse {
    #[serde(flatten)]
    pub task: TaskResponse,
    pub original_request: String,
}

fn storage_error(e: DbError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/requests",
    tag = "requests",
    responses(
        (status = 200, description = "All requests in creation order", body = RequestList),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_requests<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<RequestList>, (StatusCode, Json<ErrorResponse>)> {
    let requests = state
        .db()
        .requests()
        .list()
        .await
        .map_err(storage_error)?;

    let items: Vec<RequestResponse> = requests.into_iter().map(RequestResponse::from).collect();

    Ok(Json(RequestList {
        total: items.len(),
        items,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/{id}",
    tag = "requests",
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request found", body = RequestResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_request<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<RequestResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = state
        .db()
        .requests()
        .load(&id)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Request not found: {}", id),
                }),
            ),
            _ => storage_error(e),
        })?;

    Ok(Json(RequestResponse::from(request)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    tag = "requests",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskDetailsResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_task<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<TaskDetailsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let details = state
        .planner()
        .open_task_details(&id)
        .await
        .map_err(|e| {
            (
                status_for(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })?;

    Ok(Json(TaskDetailsResponse {
        task: TaskResponse::from(details.task),
        original_request: details.original_request,
    }))
}
