//! JSON-RPC 2.0 dispatch.
//!
//! Shared by `POST /rpc` and the WebSocket. `method` is an operation name,
//! or one of `initialize`, `tools/list` and `tools/invoke`. Batches are
//! rejected with `-32600`.

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::db::Database;
use crate::planner::{Planner, PlannerError, tool_definitions};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: String,
    data: Option<Value>,
}

impl RpcError {
    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_REQUEST,
            message: message.into(),
            data: None,
        }
    }
}

impl From<PlannerError> for RpcError {
    fn from(err: PlannerError) -> Self {
        Self {
            code: err.rpc_code(),
            message: err.to_string(),
            data: Some(json!({ "errorKind": err.kind() })),
        }
    }
}

fn error_response(id: Value, err: RpcError) -> Value {
    let mut error = json!({ "code": err.code, "message": err.message });
    if let Some(data) = err.data {
        error["data"] = data;
    }
    json!({ "jsonrpc": "2.0", "id": id, "error": error })
}

/// Handle a raw message. Returns `None` for notifications.
pub async fn handle_message<D: Database>(planner: &Planner<D>, raw: &[u8]) -> Option<Value> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(message) => handle_value(planner, message).await,
        Err(e) => {
            debug!("Unparseable JSON-RPC message: {}", e);
            Some(error_response(
                Value::Null,
                RpcError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                },
            ))
        }
    }
}

/// Handle an already-parsed message. Returns `None` for notifications.
pub async fn handle_value<D: Database>(planner: &Planner<D>, message: Value) -> Option<Value> {
    let mut obj = match message {
        Value::Object(obj) => obj,
        Value::Array(_) => {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Invalid Request: batch requests are not supported"),
            ));
        }
        _ => {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Invalid Request: expected a JSON object"),
            ));
        }
    };

    let id = obj.remove("id");

    if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Some(error_response(
            id.unwrap_or(Value::Null),
            RpcError::invalid_request("Invalid Request: jsonrpc must be \"2.0\""),
        ));
    }

    let method = match obj.remove("method") {
        Some(Value::String(method)) => method,
        _ => {
            return Some(error_response(
                id.unwrap_or(Value::Null),
                RpcError::invalid_request("Invalid Request: method must be a string"),
            ));
        }
    };

    let params = obj.remove("params").unwrap_or(Value::Null);
    let outcome = dispatch(planner, &method, params).await;

    let Some(id) = id else {
        if let Err(err) = &outcome {
            warn!(method = %method, code = err.code, "Notification failed: {}", err.message);
        }
        return None;
    };

    Some(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(err) => error_response(id, err),
    })
}

async fn dispatch<D: Database>(
    planner: &Planner<D>,
    method: &str,
    params: Value,
) -> Result<Value, RpcError> {
    debug!(method, "JSON-RPC call");

    match method {
        "initialize" => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": { "tools": {} },
        })),
        "tools/list" => Ok(json!({ "tools": tool_definitions() })),
        "tools/invoke" => {
            let (name, parameters) = split_invoke_params(params)?;
            Ok(planner.invoke_named(&name, parameters).await?)
        }
        _ => planner
            .invoke_named(method, params)
            .await
            .map_err(|err| match err {
                PlannerError::UnknownTool { .. } => RpcError {
                    code: METHOD_NOT_FOUND,
                    message: format!("Method not found: {}", method),
                    data: Some(json!({ "errorKind": err.kind() })),
                },
                other => other.into(),
            }),
    }
}

/// `tools/invoke` params are `{name, parameters}`; `arguments` is accepted
/// as an alias for `parameters`.
fn split_invoke_params(params: Value) -> Result<(String, Value), RpcError> {
    let Value::Object(mut obj) = params else {
        return Err(PlannerError::validation("tools/invoke params must be an object").into());
    };

    let name = match obj.remove("name") {
        Some(Value::String(name)) => name,
        _ => return Err(PlannerError::validation("tools/invoke requires a tool name").into()),
    };
    let parameters = obj
        .remove("parameters")
        .or_else(|| obj.remove("arguments"))
        .unwrap_or(Value::Null);

    Ok((name, parameters))
}
