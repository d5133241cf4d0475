//! Request/task planning state machine.
//!
//! # Architecture
//!
//! - `input`: Normalization of client task entries
//! - `lifecycle`: Pure state transitions on a loaded request
//! - `progress`: Progress summaries and the Markdown progress table
//! - `service`: [`Planner`], the load → transition → save driver
//! - `tools`: Tool catalogue, typed tool calls and the result envelope

mod error;
pub mod input;
pub mod lifecycle;
pub mod params;
pub mod progress;
mod service;
pub mod tools;
pub mod views;

#[cfg(test)]
mod lifecycle_test;
#[cfg(test)]
mod progress_test;

pub use error::{PlannerError, PlannerResult};
pub use input::{NewTask, TaskInput, normalize_tasks};
pub use service::Planner;
pub use tools::{ToolCall, ToolDefinition, ToolEnvelope, tool_definitions};
