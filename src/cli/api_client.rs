use std::env;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::cli::error::{CliError, CliResult};
use crate::planner::ToolEnvelope;

pub const API_URL_ENV: &str = "TASKPLAN_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:3737";

/// API client for communicating with the taskplan HTTP API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// Priority for base URL:
    /// 1. Explicit `api_url` parameter
    /// 2. TASKPLAN_API_URL environment variable
    /// 3. Default: http://localhost:3737
    pub fn new(api_url: Option<String>) -> Self {
        let base_url = api_url
            .or_else(|| env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a GET request builder
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.get(&url)
    }

    /// Create a POST request builder
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.post(&url)
    }

    /// Invoke a tool through `POST /invoke`.
    ///
    /// Returns the result fields of a successful envelope. A failed envelope
    /// becomes [`CliError::ToolFailed`] whatever the HTTP status.
    pub async fn invoke(&self, name: &str, parameters: Value) -> CliResult<Map<String, Value>> {
        let response = self
            .post("/invoke")
            .json(&json!({ "name": name, "parameters": parameters }))
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;

        let envelope: ToolEnvelope =
            serde_json::from_str(&text).map_err(|_| CliError::ApiError {
                status,
                message: text.clone(),
            })?;

        if envelope.success {
            Ok(envelope.result)
        } else {
            Err(CliError::ToolFailed {
                kind: envelope
                    .error_kind
                    .unwrap_or_else(|| "UnknownError".to_string()),
                message: envelope.error.unwrap_or_default(),
            })
        }
    }

    /// Handle API response with standardized error handling
    ///
    /// Returns the deserialized response body on success,
    /// or a CliError::ApiError on non-success status codes.
    pub async fn handle_response<T: DeserializeOwned>(response: Response) -> CliResult<T> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| CliError::InvalidResponse {
                    message: e.to_string(),
                })
        } else {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(CliError::ApiError {
                status,
                message: error_text,
            })
        }
    }
}
