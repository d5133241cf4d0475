//! System health and status handlers.

use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;
use utoipa::ToSchema;

use crate::planner::tool_definitions;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    #[schema(example = "ok")]
    pub status: String,
}

/// Tool catalogue entry
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    #[schema(example = "request_planning")]
    pub name: String,
    pub description: String,
    /// JSON Schema of the tool parameters
    #[schema(value_type = Object)]
    pub input_schema: Value,
}

/// Root endpoint
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Server banner", body = String)
    )
)]
#[instrument]
pub async fn root() -> &'static str {
    concat!("taskplan ", env!("CARGO_PKG_VERSION"))
}

/// Health check endpoint
///
/// Returns the current health status of the API
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse)
    )
)]
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// List available tools with their parameter schemas
#[utoipa::path(
    get,
    path = "/tools",
    tag = "tools",
    responses(
        (status = 200, description = "Tool catalogue", body = Vec<ToolResponse>)
    )
)]
#[instrument]
pub async fn list_tools() -> Json<Vec<ToolResponse>> {
    Json(
        tool_definitions()
            .into_iter()
            .map(|def| ToolResponse {
                name: def.name,
                description: def.description,
                input_schema: def.input_schema,
            })
            .collect(),
    )
}
