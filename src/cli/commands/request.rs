//! Request-level CLI commands

use serde::Deserialize;
use serde_json::{Value, json};
use tabled::{Table, Tabled};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::render_outcome;
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_approved, parse_task_args, to_json, truncate_with_ellipsis};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: String,
    pub original_request: String,
    pub status: String,
    pub task_count: usize,
    pub approved_count: usize,
    pub progress: String,
}

#[derive(Debug, Deserialize)]
struct ListRequestsResponse {
    requests: Vec<RequestSummary>,
}

#[derive(Tabled)]
pub(crate) struct RequestDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Request")]
    pub(crate) original_request: String,
    #[tabled(rename = "Status")]
    pub(crate) status: String,
    #[tabled(rename = "Done")]
    pub(crate) progress: String,
    #[tabled(rename = "Approved")]
    pub(crate) approved: String,
}

impl From<&RequestSummary> for RequestDisplay {
    fn from(r: &RequestSummary) -> Self {
        Self {
            id: r.id.clone(),
            original_request: truncate_with_ellipsis(&r.original_request, 40),
            status: r.status.clone(),
            progress: r.progress.clone(),
            approved: format!("{}/{}", r.approved_count, r.task_count),
        }
    }
}

pub(crate) fn format_requests_table(requests: &[RequestSummary]) -> String {
    if requests.is_empty() {
        return "No requests found.".to_string();
    }

    let display: Vec<RequestDisplay> = requests.iter().map(RequestDisplay::from).collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    table.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    pub id: String,
    pub original_request: String,
    pub split_details: Option<String>,
    pub status: String,
    pub progress: String,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub status: String,
    pub approved: bool,
}

#[derive(Tabled)]
pub(crate) struct TaskDisplay {
    #[tabled(rename = "#")]
    pub(crate) position: usize,
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[tabled(rename = "Status")]
    pub(crate) status: String,
    #[tabled(rename = "Approved")]
    pub(crate) approved: String,
}

/// Register a request with its ordered tasks
pub async fn plan(
    api_client: &ApiClient,
    original_request: &str,
    tasks: &[String],
    split_details: Option<&str>,
    format: &str,
) -> CliResult<String> {
    let tasks = parse_task_args(tasks)?;
    let mut params = json!({ "originalRequest": original_request, "tasks": tasks });
    if let Some(details) = split_details {
        params["splitDetails"] = Value::String(details.to_string());
    }

    let result = api_client.invoke("request_planning", params).await?;

    match format {
        "json" => to_json(&result),
        _ => {
            let request_id = result
                .get("requestId")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Ok(format!(
                "✓ Planned request ({})\n{}",
                request_id,
                render_outcome(&result, format)?
            ))
        }
    }
}

/// List all requests
pub async fn list(api_client: &ApiClient, format: &str) -> CliResult<String> {
    let result = api_client.invoke("list_requests", json!({})).await?;

    match format {
        "json" => to_json(&result),
        _ => {
            let response: ListRequestsResponse = serde_json::from_value(Value::Object(result))?;
            Ok(format_requests_table(&response.requests))
        }
    }
}

/// Show one request with all of its tasks
pub async fn show(api_client: &ApiClient, request_id: &str, format: &str) -> CliResult<String> {
    let response = api_client
        .get(&format!("/api/v1/requests/{}", request_id))
        .send()
        .await?;
    let view: Value = ApiClient::handle_response(response).await?;

    match format {
        "json" => to_json(&view),
        _ => {
            let view: RequestView = serde_json::from_value(view)?;
            let rows: Vec<TaskDisplay> = view
                .tasks
                .iter()
                .enumerate()
                .map(|(i, t)| TaskDisplay {
                    position: i + 1,
                    id: t.id.clone(),
                    title: truncate_with_ellipsis(&t.title, 40),
                    status: t.status.clone(),
                    approved: format_approved(t.approved),
                })
                .collect();

            let mut table = Table::new(rows);
            apply_table_style(&mut table);

            let mut output = format!(
                "Request: {}\nID:      {}\nStatus:  {} ({} done)\n",
                view.original_request, view.id, view.status, view.progress
            );
            if let Some(details) = view.split_details.filter(|d| !d.is_empty()) {
                output.push_str(&format!("Split:   {}\n", details));
            }
            output.push('\n');
            output.push_str(&table.to_string());
            Ok(output)
        }
    }
}

/// Show the next pending task
pub async fn next(api_client: &ApiClient, request_id: &str, format: &str) -> CliResult<String> {
    let result = api_client
        .invoke("get_next_task", json!({ "requestId": request_id }))
        .await?;

    match format {
        "json" => to_json(&result),
        _ => {
            let mut output = result
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if let Some(task) = result.get("task").filter(|t| t.is_object()) {
                let id = task.get("id").and_then(Value::as_str).unwrap_or_default();
                let description = task
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                output.push_str(&format!("\nTask ID: {}", id));
                if !description.is_empty() {
                    output.push_str(&format!("\n{}", description));
                }
            }
            if let Some(table) = result.get("progressTable").and_then(Value::as_str) {
                output.push_str("\n\n");
                output.push_str(table);
            }
            Ok(output)
        }
    }
}

/// Close a request after every task was approved
pub async fn complete(api_client: &ApiClient, request_id: &str, format: &str) -> CliResult<String> {
    let result = api_client
        .invoke(
            "approve_request_completion",
            json!({ "requestId": request_id }),
        )
        .await?;
    render_outcome(&result, format)
}
