//! Parameter structs for every planner operation.
//!
//! Field names are camelCase on the wire. The same structs back the tool
//! envelope, JSON-RPC, and MCP tool schemas.

use rmcp::schemars;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::input::TaskInput;

/// Confirmation string required by `clear_all_data`.
pub const CLEAR_CONFIRMATION: &str = "CLEAR_ALL_MY_DATA";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestPlanningParams {
    #[schemars(description = "The user's request in natural language. May be empty.")]
    pub original_request: String,
    #[schemars(
        description = "Ordered tasks. Each entry is {\"title\", \"description\"} or a [title, description] pair. At least one is required."
    )]
    pub tasks: Vec<TaskInput>,
    #[schemars(description = "Optional notes on how the request was split into tasks")]
    pub split_details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestIdParams {
    #[schemars(description = "Request ID returned by request_planning")]
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkTaskDoneParams {
    #[schemars(description = "Request ID")]
    pub request_id: String,
    #[schemars(description = "Task ID to mark as done")]
    pub task_id: String,
    #[schemars(description = "Notes on what was done (optional)")]
    pub completed_details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRefParams {
    #[schemars(description = "Request ID")]
    pub request_id: String,
    #[schemars(description = "Task ID")]
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTasksParams {
    #[schemars(description = "Request ID to append tasks to")]
    pub request_id: String,
    #[schemars(description = "Tasks to append, same format as request_planning")]
    pub tasks: Vec<TaskInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskParams {
    #[schemars(description = "Request ID")]
    pub request_id: String,
    #[schemars(description = "Task ID to update. Only pending tasks can be updated.")]
    pub task_id: String,
    #[schemars(description = "New title (optional)")]
    pub title: Option<String>,
    #[schemars(description = "New description (optional)")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListRequestsParams {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskIdParams {
    #[schemars(description = "Task ID")]
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClearAllDataParams {
    #[schemars(description = "Must be exactly \"CLEAR_ALL_MY_DATA\"")]
    pub confirmation: String,
}
