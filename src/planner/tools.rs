//! Tool catalogue and generic dispatch.
//!
//! A tool call is `{"name": <operation>, "parameters": {...}}`. [`ToolCall`]
//! is the typed form, [`Planner::invoke`] runs it, and [`ToolEnvelope`]
//! wraps the outcome in the `success` envelope clients expect.

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::db::{Database, DbError};

use super::error::{PlannerError, PlannerResult};
use super::params::{
    AddTasksParams, ClearAllDataParams, ListRequestsParams, MarkTaskDoneParams,
    RequestIdParams, RequestPlanningParams, TaskIdParams, TaskRefParams, UpdateTaskParams,
};
use super::service::Planner;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", content = "parameters", rename_all = "snake_case")]
pub enum ToolCall {
    RequestPlanning(RequestPlanningParams),
    GetNextTask(RequestIdParams),
    MarkTaskDone(MarkTaskDoneParams),
    ApproveTaskCompletion(TaskRefParams),
    ApproveRequestCompletion(RequestIdParams),
    AddTasksToRequest(AddTasksParams),
    UpdateTask(UpdateTaskParams),
    DeleteTask(TaskRefParams),
    ListRequests(ListRequestsParams),
    OpenTaskDetails(TaskIdParams),
    ClearAllData(ClearAllDataParams),
}

/// Every tool name, in catalogue order.
pub const TOOL_NAMES: [&str; 11] = [
    "request_planning",
    "get_next_task",
    "mark_task_done",
    "approve_task_completion",
    "approve_request_completion",
    "add_tasks_to_request",
    "update_task",
    "delete_task",
    "list_requests",
    "open_task_details",
    "clear_all_data",
];

impl ToolCall {
    /// Build a call from a tool name and raw parameters.
    ///
    /// `null` parameters count as `{}`. A list whose first element is an
    /// object is unwrapped to that object.
    pub fn parse(name: &str, parameters: Value) -> PlannerResult<Self> {
        if !TOOL_NAMES.contains(&name) {
            return Err(PlannerError::UnknownTool {
                name: name.to_string(),
            });
        }

        let parameters = match parameters {
            Value::Null => Value::Object(Map::new()),
            Value::Array(items) => match items.into_iter().next() {
                Some(first @ Value::Object(_)) => first,
                _ => {
                    return Err(PlannerError::validation(format!(
                        "parameters for {} must be an object",
                        name
                    )));
                }
            },
            other => other,
        };

        serde_json::from_value(json!({ "name": name, "parameters": parameters })).map_err(|e| {
            PlannerError::validation(format!("invalid parameters for {}: {}", name, e))
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::RequestPlanning(_) => "request_planning",
            ToolCall::GetNextTask(_) => "get_next_task",
            ToolCall::MarkTaskDone(_) => "mark_task_done",
            ToolCall::ApproveTaskCompletion(_) => "approve_task_completion",
            ToolCall::ApproveRequestCompletion(_) => "approve_request_completion",
            ToolCall::AddTasksToRequest(_) => "add_tasks_to_request",
            ToolCall::UpdateTask(_) => "update_task",
            ToolCall::DeleteTask(_) => "delete_task",
            ToolCall::ListRequests(_) => "list_requests",
            ToolCall::OpenTaskDetails(_) => "open_task_details",
            ToolCall::ClearAllData(_) => "clear_all_data",
        }
    }
}

fn to_value<T: Serialize>(result: T) -> PlannerResult<Value> {
    serde_json::to_value(result).map_err(|e| {
        PlannerError::Storage(DbError::Serialization {
            message: e.to_string(),
        })
    })
}

impl<D: Database> Planner<D> {
    /// Run a tool call and return its JSON result.
    pub async fn invoke(&self, call: ToolCall) -> PlannerResult<Value> {
        match call {
            ToolCall::RequestPlanning(p) => to_value(
                self.request_planning(p.original_request, &p.tasks, p.split_details)
                    .await?,
            ),
            ToolCall::GetNextTask(p) => to_value(self.get_next_task(&p.request_id).await?),
            ToolCall::MarkTaskDone(p) => to_value(
                self.mark_task_done(&p.request_id, &p.task_id, p.completed_details)
                    .await?,
            ),
            ToolCall::ApproveTaskCompletion(p) => to_value(
                self.approve_task_completion(&p.request_id, &p.task_id)
                    .await?,
            ),
            ToolCall::ApproveRequestCompletion(p) => {
                to_value(self.approve_request_completion(&p.request_id).await?)
            }
            ToolCall::AddTasksToRequest(p) => {
                to_value(self.add_tasks_to_request(&p.request_id, &p.tasks).await?)
            }
            ToolCall::UpdateTask(p) => to_value(
                self.update_task(&p.request_id, &p.task_id, p.title, p.description)
                    .await?,
            ),
            ToolCall::DeleteTask(p) => {
                to_value(self.delete_task(&p.request_id, &p.task_id).await?)
            }
            ToolCall::ListRequests(_) => to_value(self.list_requests().await?),
            ToolCall::OpenTaskDetails(p) => to_value(self.open_task_details(&p.task_id).await?),
            ToolCall::ClearAllData(p) => to_value(self.clear_all_data(&p.confirmation).await?),
        }
    }

    /// Parse and run a call given by name.
    pub async fn invoke_named(&self, name: &str, parameters: Value) -> PlannerResult<Value> {
        let call = ToolCall::parse(name, parameters)?;
        self.invoke(call).await
    }
}

/// `{"success": true, ...result}` or `{"success": false, "error", "errorKind"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(flatten)]
    pub result: Map<String, Value>,
}

impl ToolEnvelope {
    pub fn success(result: Value) -> Self {
        let result = match result {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
        };
        Self {
            success: true,
            error: None,
            error_kind: None,
            result,
        }
    }

    pub fn failure(err: &PlannerError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            error_kind: Some(err.kind().to_string()),
            result: Map::new(),
        }
    }

    pub fn from_result(result: PlannerResult<Value>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(err) => Self::failure(&err),
        }
    }
}

/// Catalogue entry describing one tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

fn definition<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(P);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(&schema).unwrap_or(Value::Null),
    }
}

const REQUEST_PLANNING_DESCRIPTION: &str = "Register a new user request and plan its tasks. Tasks are executed in the given order. After planning, call get_next_task to start working.";
const GET_NEXT_TASK_DESCRIPTION: &str = "Get the next pending task of a request together with a progress table. When hasNextTask is false and allTasksDone is true, ask for request approval.";
const MARK_TASK_DONE_DESCRIPTION: &str = "Mark a task as done, optionally with completion details. The task then waits for approval.";
const APPROVE_TASK_COMPLETION_DESCRIPTION: &str = "Approve a completed task. Fails if the task is not done yet or already approved.";
const APPROVE_REQUEST_COMPLETION_DESCRIPTION: &str = "Close a request once every task is done and approved.";
const ADD_TASKS_TO_REQUEST_DESCRIPTION: &str = "Append new tasks to a request that is not completed yet.";
const UPDATE_TASK_DESCRIPTION: &str = "Change the title and/or description of a pending task.";
const DELETE_TASK_DESCRIPTION: &str = "Delete a pending task. Done tasks and the last task of a request cannot be deleted.";
const LIST_REQUESTS_DESCRIPTION: &str = "List all requests with their status and task progress.";
const OPEN_TASK_DETAILS_DESCRIPTION: &str = "Show every field of a task, looked up by task ID alone.";
const CLEAR_ALL_DATA_DESCRIPTION: &str = "Delete ALL requests and tasks. Requires confirmation \"CLEAR_ALL_MY_DATA\".";

/// Name, description and parameter schema of every tool.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        definition::<RequestPlanningParams>("request_planning", REQUEST_PLANNING_DESCRIPTION),
        definition::<RequestIdParams>("get_next_task", GET_NEXT_TASK_DESCRIPTION),
        definition::<MarkTaskDoneParams>("mark_task_done", MARK_TASK_DONE_DESCRIPTION),
        definition::<TaskRefParams>(
            "approve_task_completion",
            APPROVE_TASK_COMPLETION_DESCRIPTION,
        ),
        definition::<RequestIdParams>(
            "approve_request_completion",
            APPROVE_REQUEST_COMPLETION_DESCRIPTION,
        ),
        definition::<AddTasksParams>("add_tasks_to_request", ADD_TASKS_TO_REQUEST_DESCRIPTION),
        definition::<UpdateTaskParams>("update_task", UPDATE_TASK_DESCRIPTION),
        definition::<TaskRefParams>("delete_task", DELETE_TASK_DESCRIPTION),
        definition::<ListRequestsParams>("list_requests", LIST_REQUESTS_DESCRIPTION),
        definition::<TaskIdParams>("open_task_details", OPEN_TASK_DETAILS_DESCRIPTION),
        definition::<ClearAllDataParams>("clear_all_data", CLEAR_ALL_DATA_DESCRIPTION),
    ]
}
