//! Task entries as they arrive from clients.
//!
//! Clients send tasks either as `{"title": .., "description": ..}` objects or
//! as `[title, description]` pairs. Anything else is kept verbatim so the
//! failure can be reported against its index.

use rmcp::schemars;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{PlannerError, PlannerResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TaskInput {
    /// Object form.
    Record {
        #[schemars(description = "Short task title (required)")]
        title: Option<String>,
        #[schemars(description = "What needs to be done (optional, defaults to empty)")]
        description: Option<String>,
    },
    /// `[title, description]` form.
    Pair(String, String),
    #[schemars(skip)]
    Other(Value),
}

impl TaskInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        TaskInput::Record {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }
}

/// A validated task ready to be attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
}

/// Convert client task entries into [`NewTask`]s, failing on the first bad entry.
pub fn normalize_tasks(inputs: &[TaskInput]) -> PlannerResult<Vec<NewTask>> {
    if inputs.is_empty() {
        return Err(PlannerError::validation("at least one task is required"));
    }

    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| normalize_task(index, input))
        .collect()
}

fn normalize_task(index: usize, input: &TaskInput) -> PlannerResult<NewTask> {
    let (title, description) = match input {
        TaskInput::Record { title, description } => {
            let title = title.as_deref().ok_or_else(|| {
                PlannerError::validation(format!("task at index {} is missing a title", index))
            })?;
            (title, description.as_deref().unwrap_or_default())
        }
        TaskInput::Pair(title, description) => (title.as_str(), description.as_str()),
        TaskInput::Other(_) => {
            return Err(PlannerError::validation(format!(
                "task at index {} must be an object with a title or a [title, description] pair",
                index
            )));
        }
    };

    if title.trim().is_empty() {
        return Err(PlannerError::validation(format!(
            "task at index {} has a blank title",
            index
        )));
    }

    Ok(NewTask {
        title: title.to_string(),
        description: description.to_string(),
    })
}
