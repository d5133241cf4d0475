//! Progress summaries and the Markdown progress table.

use serde::{Deserialize, Serialize};

use crate::db::{Id, Request, Task, TaskStatus};

/// Compact per-task state used in progress listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub id: Id,
    pub title: String,
    pub status: TaskStatus,
    pub approved: bool,
}

impl From<&Task> for TaskProgress {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            status: task.status,
            approved: task.approved,
        }
    }
}

pub fn tasks_progress(request: &Request) -> Vec<TaskProgress> {
    request.tasks.iter().map(TaskProgress::from).collect()
}

/// Render the request's tasks as a Markdown table, one row per task.
pub fn render_table(request: &Request) -> String {
    let mut table = String::from("| # | ID | Title | Status | Approved |\n");
    table.push_str("|---|----|-------|--------|----------|\n");

    for (index, task) in request.tasks.iter().enumerate() {
        let status = match task.status {
            TaskStatus::Pending => "⏳",
            TaskStatus::Done => "✅",
        };
        let approved = if task.approved { "✓" } else { "✗" };
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            index + 1,
            task.id,
            escape_cell(&task.title),
            status,
            approved
        ));
    }

    table
}

fn escape_cell(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('|', "\\|")
}

/// `"done/total"` progress string.
pub fn progress_fraction(request: &Request) -> String {
    format!("{}/{}", request.completed_count(), request.tasks.len())
}
