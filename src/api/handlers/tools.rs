//! Tool envelope endpoint.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{instrument, warn};
use utoipa::ToSchema;

use crate::api::AppState;
use crate::db::Database;
use crate::planner::{PlannerError, ToolEnvelope};

use super::status_for;

/// Tool invocation body
#[derive(Debug, Deserialize, ToSchema)]
pub struct InvokeRequest {
    #[schema(example = "get_next_task")]
    pub name: String,
    /// Operation parameters
    #[serde(default)]
    #[schema(value_type = Object)]
    pub parameters: Value,
}

/// Invoke a tool by name
///
/// The body of every response is the `{"success": ...}` envelope.
#[utoipa::path(
    post,
    path = "/invoke",
    tag = "tools",
    request_body = InvokeRequest,
    responses(
        (status = 200, description = "Tool succeeded"),
        (status = 400, description = "Invalid parameters or malformed body"),
        (status = 404, description = "Unknown tool, request or task"),
        (status = 409, description = "Operation not allowed in the current state"),
        (status = 500, description = "Storage failure")
    )
)]
#[instrument(skip(state, body))]
pub async fn invoke<D: Database>(
    State(state): State<AppState<D>>,
    body: Bytes,
) -> (StatusCode, Json<ToolEnvelope>) {
    let request: InvokeRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let err = PlannerError::validation(format!("malformed request body: {}", e));
            return (StatusCode::BAD_REQUEST, Json(ToolEnvelope::failure(&err)));
        }
    };

    match state
        .planner()
        .invoke_named(&request.name, request.parameters)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ToolEnvelope::success(result))),
        Err(err) => {
            warn!(tool = %request.name, kind = err.kind(), "Tool call failed: {}", err);
            (status_for(&err), Json(ToolEnvelope::failure(&err)))
        }
    }
}
