//! Tool catalogue and maintenance commands

use serde::Deserialize;
use serde_json::{Value, json};
use tabled::{Table, Tabled};

use crate::cli::api_client::ApiClient;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{apply_table_style, to_json, truncate_with_ellipsis};

#[derive(Debug, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

#[derive(Tabled)]
pub(crate) struct ToolDisplay {
    #[tabled(rename = "Tool")]
    pub(crate) name: String,
    #[tabled(rename = "Description")]
    pub(crate) description: String,
}

/// List the tools the server offers
pub async fn list_tools(api_client: &ApiClient, format: &str) -> CliResult<String> {
    let response = api_client.get("/tools").send().await?;
    let tools: Vec<Value> = ApiClient::handle_response(response).await?;

    match format {
        "json" => to_json(&tools),
        _ => {
            let tools: Vec<ToolInfo> = serde_json::from_value(Value::Array(tools))?;
            let display: Vec<ToolDisplay> = tools
                .iter()
                .map(|t| ToolDisplay {
                    name: t.name.clone(),
                    description: truncate_with_ellipsis(&t.description, 60),
                })
                .collect();
            let mut table = Table::new(display);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Invoke any tool with raw JSON parameters; prints the result fields
pub async fn invoke(api_client: &ApiClient, name: &str, params: Option<&str>) -> CliResult<String> {
    let params = match params {
        Some(raw) => serde_json::from_str(raw).map_err(|e| CliError::InvalidArgument {
            message: format!("parameters must be JSON: {}", e),
        })?,
        None => json!({}),
    };

    let result = api_client.invoke(name, params).await?;
    to_json(&result)
}

/// Remove every request and task
pub async fn clear(api_client: &ApiClient, confirmation: &str) -> CliResult<String> {
    let result = api_client
        .invoke("clear_all_data", json!({ "confirmation": confirmation }))
        .await?;

    let removed = result
        .get("removedRequests")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    Ok(format!("✓ Removed {} request(s)", removed))
}
