//! Shared utilities for CLI commands

use serde_json::{Value, json};
use tabled::{Table, settings::Style};

use crate::cli::error::{CliError, CliResult};

/// Separator between title and description in `--task` arguments.
pub const TASK_SEPARATOR: &str = "::";

/// Truncate a string with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Check mark for approved tasks
pub fn format_approved(approved: bool) -> String {
    if approved { "✓" } else { "✗" }.to_string()
}

/// Turn `TITLE` or `TITLE::DESCRIPTION` into a task object.
pub fn parse_task_arg(arg: &str) -> CliResult<Value> {
    let (title, description) = match arg.split_once(TASK_SEPARATOR) {
        Some((title, description)) => (title.trim(), description.trim()),
        None => (arg.trim(), ""),
    };

    if title.is_empty() {
        return Err(CliError::InvalidArgument {
            message: format!("task '{}' has an empty title", arg),
        });
    }

    Ok(json!({ "title": title, "description": description }))
}

/// Parse every `--task` argument.
pub fn parse_task_args(args: &[String]) -> CliResult<Vec<Value>> {
    args.iter().map(|a| parse_task_arg(a)).collect()
}

/// Pretty JSON for `--format json`.
pub fn to_json<T: serde::Serialize>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}
