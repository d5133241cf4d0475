//! MCP server implementation
//!
//! Each tool forwards to the shared planner and returns the operation's
//! JSON result as pretty-printed text content.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use serde_json::json;

use crate::db::Database;
use crate::planner::params::{
    AddTasksParams, ClearAllDataParams, ListRequestsParams, MarkTaskDoneParams,
    RequestIdParams, RequestPlanningParams, TaskIdParams, TaskRefParams, UpdateTaskParams,
};
use crate::planner::{Planner, PlannerError};

/// MCP server over a shared planner.
///
/// Generic over `D: Database` for zero-cost abstraction (no dynamic dispatch).
/// One instance is created per MCP session; all of them share the planner.
pub struct McpServer<D: Database> {
    planner: Arc<Planner<D>>,
    tool_router: ToolRouter<Self>,
}

// Manual Clone impl - only the Arc needs cloning, not D
impl<D: Database> Clone for McpServer<D> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
            tool_router: self.tool_router.clone(),
        }
    }
}

/// Map planner errors onto MCP error codes.
pub(crate) fn map_planner_error(err: PlannerError) -> McpError {
    let data = Some(json!({"error": err.to_string(), "errorKind": err.kind()}));
    match err {
        PlannerError::NotFound { .. } => McpError::resource_not_found("not_found", data),
        PlannerError::Validation { .. } | PlannerError::UnknownTool { .. } => {
            McpError::invalid_params("validation_error", data)
        }
        PlannerError::InvalidState { .. } => McpError::invalid_request("invalid_state", data),
        PlannerError::Storage(_) => McpError::internal_error("storage_error", data),
    }
}

fn text_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(
            "serialization_error",
            Some(json!({"error": e.to_string()})),
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_router]
impl<D: Database + 'static> McpServer<D> {
    pub fn new(planner: Arc<Planner<D>>) -> Self {
        Self {
            planner,
            tool_router: Self::tool_router(),
        }
    }

    /// Get the tool router for this handler
    pub fn router(&self) -> &ToolRouter<Self> {
        &self.tool_router
    }

    #[tool(
        description = "Register a new user request and plan its tasks. Tasks run in the given order; each is an object {title, description} or a [title, description] pair. After planning, call get_next_task."
    )]
    pub async fn request_planning(
        &self,
        params: Parameters<RequestPlanningParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let result = self
            .planner
            .request_planning(p.original_request, &p.tasks, p.split_details)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(
        description = "Get the next pending task of a request with a progress table. When hasNextTask is false and allTasksDone is true, ask the user to approve the whole request."
    )]
    pub async fn get_next_task(
        &self,
        params: Parameters<RequestIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .planner
            .get_next_task(&params.0.request_id)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(
        description = "Mark a task as done with optional completion details. The user must then approve it with approve_task_completion."
    )]
    pub async fn mark_task_done(
        &self,
        params: Parameters<MarkTaskDoneParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let result = self
            .planner
            .mark_task_done(&p.request_id, &p.task_id, p.completed_details)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(
        description = "Approve a completed task. Fails if the task is not done or already approved."
    )]
    pub async fn approve_task_completion(
        &self,
        params: Parameters<TaskRefParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .planner
            .approve_task_completion(&params.0.request_id, &params.0.task_id)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(description = "Close a request once every task is done and approved.")]
    pub async fn approve_request_completion(
        &self,
        params: Parameters<RequestIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .planner
            .approve_request_completion(&params.0.request_id)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(description = "Append new tasks to a request that is not completed yet.")]
    pub async fn add_tasks_to_request(
        &self,
        params: Parameters<AddTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .planner
            .add_tasks_to_request(&params.0.request_id, &params.0.tasks)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(description = "Change the title and/or description of a pending task.")]
    pub async fn update_task(
        &self,
        params: Parameters<UpdateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let result = self
            .planner
            .update_task(&p.request_id, &p.task_id, p.title, p.description)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(
        description = "Delete a pending task. Done tasks and the last task of a request cannot be deleted."
    )]
    pub async fn delete_task(
        &self,
        params: Parameters<TaskRefParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .planner
            .delete_task(&params.0.request_id, &params.0.task_id)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(description = "List all requests with status and \"done/total\" progress.")]
    pub async fn list_requests(
        &self,
        _params: Parameters<ListRequestsParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .planner
            .list_requests()
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(description = "Show every field of a task, looked up by task ID alone.")]
    pub async fn open_task_details(
        &self,
        params: Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .planner
            .open_task_details(&params.0.task_id)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }

    #[tool(
        description = "Delete ALL requests and tasks. Only runs when confirmation is exactly \"CLEAR_ALL_MY_DATA\"."
    )]
    pub async fn clear_all_data(
        &self,
        params: Parameters<ClearAllDataParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .planner
            .clear_all_data(&params.0.confirmation)
            .await
            .map_err(map_planner_error)?;
        text_result(&result)
    }
}

#[tool_handler]
impl<D: Database + 'static> ServerHandler for McpServer<D> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "taskplan MCP Server - Plan a request as ordered tasks, then work through them: get_next_task, mark_task_done, approve_task_completion, and finally approve_request_completion.",
        )
    }
}
