//! Tests for the MCP server tool surface

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::RawContent;
use serde_json::Value;

use crate::api::notifier::ChangeNotifier;
use crate::db::{Database, MemoryDatabase, SqliteDatabase};
use crate::planner::params::{
    ClearAllDataParams, ListRequestsParams, MarkTaskDoneParams, RequestIdParams,
    RequestPlanningParams, TaskIdParams, TaskRefParams,
};
use crate::planner::{Planner, TaskInput};

use super::server::McpServer;

fn server() -> McpServer<MemoryDatabase> {
    let planner = Planner::new(MemoryDatabase::new(), ChangeNotifier::new());
    McpServer::new(Arc::new(planner))
}

fn result_json(result: &rmcp::model::CallToolResult) -> Value {
    let text = match &result.content[0].raw {
        RawContent::Text(text) => text.text.as_str(),
        _ => panic!("Expected text content"),
    };
    serde_json::from_str(text).expect("tool output should be JSON")
}

async fn plan(server: &McpServer<MemoryDatabase>, titles: &[&str]) -> Value {
    let params = RequestPlanningParams {
        original_request: "Ship the release".to_string(),
        tasks: titles
            .iter()
            .map(|t| TaskInput::new(*t, format!("do {}", t)))
            .collect(),
        split_details: None,
    };
    let result = server
        .request_planning(Parameters(params))
        .await
        .expect("request_planning should succeed");
    result_json(&result)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_info() {
    use rmcp::ServerHandler;

    let info = server().get_info();

    assert!(
        info.capabilities.tools.is_some(),
        "Server should support tools"
    );
    assert!(
        info.instructions.is_some(),
        "Server should provide instructions"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_every_operation_is_registered() {
    let server = server();
    let tools = server.router().list_all();
    let mut names: Vec<String> = tools.iter().map(|t| t.name.to_string()).collect();
    names.sort();

    let mut expected: Vec<String> = crate::planner::tools::TOOL_NAMES
        .iter()
        .map(|n| n.to_string())
        .collect();
    expected.sort();

    assert_eq!(names, expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_workflow_through_tools() {
    let server = server();
    let planned = plan(&server, &["T1"]).await;
    let request_id = planned["requestId"].as_str().unwrap().to_string();
    let task_id = planned["tasks"][0]["id"].as_str().unwrap().to_string();

    let next = result_json(
        &server
            .get_next_task(Parameters(RequestIdParams {
                request_id: request_id.clone(),
            }))
            .await
            .unwrap(),
    );
    assert_eq!(next["hasNextTask"], true);
    assert_eq!(next["task"]["title"], "T1");

    server
        .mark_task_done(Parameters(MarkTaskDoneParams {
            request_id: request_id.clone(),
            task_id: task_id.clone(),
            completed_details: Some("done".to_string()),
        }))
        .await
        .unwrap();
    server
        .approve_task_completion(Parameters(TaskRefParams {
            request_id: request_id.clone(),
            task_id: task_id.clone(),
        }))
        .await
        .unwrap();

    let completed = result_json(
        &server
            .approve_request_completion(Parameters(RequestIdParams {
                request_id: request_id.clone(),
            }))
            .await
            .unwrap(),
    );
    assert_eq!(completed["request"]["status"], "COMPLETED");

    let details = result_json(
        &server
            .open_task_details(Parameters(TaskIdParams { task_id }))
            .await
            .unwrap(),
    );
    assert_eq!(details["approved"], true);
    assert_eq!(details["originalRequest"], "Ship the release");

    let listed = result_json(
        &server
            .list_requests(Parameters(ListRequestsParams::default()))
            .await
            .unwrap(),
    );
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["requests"][0]["progress"], "1/1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_request_maps_to_resource_not_found() {
    let server = server();

    let err = server
        .get_next_task(Parameters(RequestIdParams {
            request_id: "req-missing".to_string(),
        }))
        .await
        .expect_err("missing request should fail");

    assert_eq!(err.code, rmcp::model::ErrorCode::RESOURCE_NOT_FOUND);
    assert_eq!(err.data.as_ref().unwrap()["errorKind"], "NotFoundError");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_approving_pending_task_is_invalid_request() {
    let server = server();
    let planned = plan(&server, &["A", "B"]).await;

    let err = server
        .approve_task_completion(Parameters(TaskRefParams {
            request_id: planned["requestId"].as_str().unwrap().to_string(),
            task_id: planned["tasks"][1]["id"].as_str().unwrap().to_string(),
        }))
        .await
        .expect_err("pending task cannot be approved");

    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_REQUEST);
    assert_eq!(err.data.as_ref().unwrap()["errorKind"], "InvalidStateError");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clear_requires_confirmation() {
    let server = server();
    plan(&server, &["A"]).await;

    let err = server
        .clear_all_data(Parameters(ClearAllDataParams {
            confirmation: "yes".to_string(),
        }))
        .await
        .expect_err("wrong confirmation should fail");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

    let cleared = result_json(
        &server
            .clear_all_data(Parameters(ClearAllDataParams {
                confirmation: "CLEAR_ALL_MY_DATA".to_string(),
            }))
            .await
            .unwrap(),
    );
    assert_eq!(cleared["removedRequests"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_over_sqlite() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Failed to run migrations");
    let server = McpServer::new(Arc::new(Planner::new(db, ChangeNotifier::new())));

    let params = RequestPlanningParams {
        original_request: "X".to_string(),
        tasks: vec![TaskInput::new("A", "a")],
        split_details: Some("one step".to_string()),
    };
    let planned = result_json(&server.request_planning(Parameters(params)).await.unwrap());

    assert_eq!(planned["taskCount"], 1);
}
