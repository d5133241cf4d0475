//! Task-level CLI commands

use serde_json::{Value, json};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::render_outcome;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{format_approved, parse_task_args, to_json};

/// Mark a task as done
pub async fn done(
    api_client: &ApiClient,
    request_id: &str,
    task_id: &str,
    details: Option<&str>,
    format: &str,
) -> CliResult<String> {
    let mut params = json!({ "requestId": request_id, "taskId": task_id });
    if let Some(details) = details {
        params["completedDetails"] = Value::String(details.to_string());
    }

    let result = api_client.invoke("mark_task_done", params).await?;
    render_outcome(&result, format)
}

/// Approve a completed task
pub async fn approve(
    api_client: &ApiClient,
    request_id: &str,
    task_id: &str,
    format: &str,
) -> CliResult<String> {
    let result = api_client
        .invoke(
            "approve_task_completion",
            json!({ "requestId": request_id, "taskId": task_id }),
        )
        .await?;
    render_outcome(&result, format)
}

/// Append tasks to a request
pub async fn add(
    api_client: &ApiClient,
    request_id: &str,
    tasks: &[String],
    format: &str,
) -> CliResult<String> {
    let tasks = parse_task_args(tasks)?;
    let result = api_client
        .invoke(
            "add_tasks_to_request",
            json!({ "requestId": request_id, "tasks": tasks }),
        )
        .await?;
    render_outcome(&result, format)
}

/// Edit title and/or description of a pending task
pub async fn update(
    api_client: &ApiClient,
    request_id: &str,
    task_id: &str,
    title: Option<&str>,
    description: Option<&str>,
    format: &str,
) -> CliResult<String> {
    if title.is_none() && description.is_none() {
        return Err(CliError::InvalidArgument {
            message: "pass --title and/or --description".to_string(),
        });
    }

    let mut params = json!({ "requestId": request_id, "taskId": task_id });
    if let Some(title) = title {
        params["title"] = Value::String(title.to_string());
    }
    if let Some(description) = description {
        params["description"] = Value::String(description.to_string());
    }

    let result = api_client.invoke("update_task", params).await?;
    render_outcome(&result, format)
}

/// Delete a pending task
pub async fn delete(
    api_client: &ApiClient,
    request_id: &str,
    task_id: &str,
    format: &str,
) -> CliResult<String> {
    let result = api_client
        .invoke(
            "delete_task",
            json!({ "requestId": request_id, "taskId": task_id }),
        )
        .await?;
    render_outcome(&result, format)
}

/// Show every field of a task
pub async fn details(api_client: &ApiClient, task_id: &str, format: &str) -> CliResult<String> {
    let result = api_client
        .invoke("open_task_details", json!({ "taskId": task_id }))
        .await?;

    if format == "json" {
        return to_json(&result);
    }

    let field = |name: &str| -> String {
        match result.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "-".to_string(),
            Some(other) => other.to_string(),
        }
    };
    let approved = result
        .get("approved")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut output = String::new();
    output.push_str(&format!("Task:        {}\n", field("title")));
    output.push_str(&format!("ID:          {}\n", field("id")));
    output.push_str(&format!("Request:     {} ({})\n", field("originalRequest"), field("requestId")));
    output.push_str(&format!("Status:      {}\n", field("status")));
    output.push_str(&format!("Approved:    {}\n", format_approved(approved)));
    output.push_str(&format!("Created:     {}\n", field("createdAt")));
    output.push_str(&format!("Completed:   {}\n", field("completedAt")));
    output.push_str(&format!("Approved at: {}\n", field("approvedAt")));
    output.push_str(&format!("\n{}\n", field("description")));
    if let Some(Value::String(details)) = result.get("completedDetails") {
        output.push_str(&format!("\nCompletion details:\n{}\n", details));
    }
    Ok(output)
}
