//! The planner service.
//!
//! [`Planner`] owns the injected backend and runs every operation as a
//! load → transition → save sequence. Mutating operations hold a
//! planner-wide lock for that whole span so concurrent callers cannot
//! interleave on the same request.

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::notifier::{ChangeNotifier, UpdateMessage};
use crate::db::{Database, Request, RequestRepository};

use super::error::{PlannerError, PlannerResult};
use super::input::{TaskInput, normalize_tasks};
use super::lifecycle;
use super::params::CLEAR_CONFIRMATION;
use super::progress::{render_table, tasks_progress};
use super::views::{
    AddTasksResult, ClearResult, DeleteTaskResult, ListRequestsResult, NextTaskResult,
    PlanningResult, RequestCompletionResult, RequestSummary, TaskDetails, TaskResult,
    TaskSummary,
};

pub struct Planner<D: Database> {
    db: D,
    write_lock: Mutex<()>,
    notifier: ChangeNotifier,
}

impl<D: Database> Planner<D> {
    pub fn new(db: D, notifier: ChangeNotifier) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
            notifier,
        }
    }

    /// Get a reference to the backing database.
    pub fn db(&self) -> &D {
        &self.db
    }

    /// Get a reference to the change notifier.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    async fn load(&self, request_id: &str) -> PlannerResult<Request> {
        Ok(self.db.requests().load(request_id).await?)
    }

    async fn save(&self, request: &Request) -> PlannerResult<()> {
        Ok(self.db.requests().save(request).await?)
    }

    /// Register a new request together with its ordered tasks.
    pub async fn request_planning(
        &self,
        original_request: String,
        tasks: &[TaskInput],
        split_details: Option<String>,
    ) -> PlannerResult<PlanningResult> {
        let tasks = normalize_tasks(tasks)?;
        let request = lifecycle::new_request(original_request, split_details, tasks);

        {
            let _guard = self.write_lock.lock().await;
            self.save(&request).await?;
        }

        info!(request_id = %request.id, task_count = request.tasks.len(), "Request planned");
        self.notifier.notify(UpdateMessage::RequestCreated {
            request_id: request.id.clone(),
        });

        Ok(PlanningResult {
            message: format!(
                "Request registered with {} task(s). Call get_next_task to start.",
                request.tasks.len()
            ),
            request_id: request.id.clone(),
            task_count: request.tasks.len(),
            tasks: request
                .tasks
                .iter()
                .map(|t| TaskSummary {
                    id: t.id.clone(),
                    title: t.title.clone(),
                })
                .collect(),
            progress_table: render_table(&request),
        })
    }

    /// Return the first pending task of a request, if any.
    pub async fn get_next_task(&self, request_id: &str) -> PlannerResult<NextTaskResult> {
        let request = self.load(request_id).await?;
        let next = lifecycle::next_pending(&request).cloned();
        let all_tasks_done = lifecycle::all_tasks_approved(&request);

        let message = match (&next, all_tasks_done) {
            (Some(task), _) => format!("Next task: {}", task.title),
            (None, true) => {
                "All tasks are done and approved. Call approve_request_completion to close the request."
                    .to_string()
            }
            (None, false) => {
                "No pending tasks. Some completed tasks still await approval.".to_string()
            }
        };

        debug!(request_id, has_next_task = next.is_some(), "Next task looked up");

        Ok(NextTaskResult {
            message,
            has_next_task: next.is_some(),
            all_tasks_done,
            task: next,
            tasks_progress: tasks_progress(&request),
            progress_table: render_table(&request),
        })
    }

    pub async fn mark_task_done(
        &self,
        request_id: &str,
        task_id: &str,
        completed_details: Option<String>,
    ) -> PlannerResult<TaskResult> {
        let (request, task) = {
            let _guard = self.write_lock.lock().await;
            let mut request = self.load(request_id).await?;
            let task = lifecycle::mark_done(&mut request, task_id, completed_details)?;
            self.save(&request).await?;
            (request, task)
        };

        info!(request_id, task_id, "Task marked done");
        self.notifier.notify(UpdateMessage::TaskDone {
            request_id: request.id.clone(),
            task_id: task.id.clone(),
        });

        Ok(TaskResult {
            message: format!(
                "Task '{}' marked done. It must be approved with approve_task_completion.",
                task.title
            ),
            task,
            tasks_progress: tasks_progress(&request),
            progress_table: render_table(&request),
        })
    }

    pub async fn approve_task_completion(
        &self,
        request_id: &str,
        task_id: &str,
    ) -> PlannerResult<TaskResult> {
        let (request, task) = {
            let _guard = self.write_lock.lock().await;
            let mut request = self.load(request_id).await?;
            let task = lifecycle::approve_task(&mut request, task_id)?;
            self.save(&request).await?;
            (request, task)
        };

        info!(request_id, task_id, "Task approved");
        self.notifier.notify(UpdateMessage::TaskApproved {
            request_id: request.id.clone(),
            task_id: task.id.clone(),
        });

        Ok(TaskResult {
            message: format!("Task '{}' approved.", task.title),
            task,
            tasks_progress: tasks_progress(&request),
            progress_table: render_table(&request),
        })
    }

    pub async fn approve_request_completion(
        &self,
        request_id: &str,
    ) -> PlannerResult<RequestCompletionResult> {
        let request = {
            let _guard = self.write_lock.lock().await;
            let mut request = self.load(request_id).await?;
            lifecycle::complete_request(&mut request)?;
            self.save(&request).await?;
            request
        };

        info!(request_id, "Request completed");
        self.notifier.notify(UpdateMessage::RequestCompleted {
            request_id: request.id.clone(),
        });

        Ok(RequestCompletionResult {
            message: "Request completed.".to_string(),
            tasks_progress: tasks_progress(&request),
            request,
        })
    }

    pub async fn add_tasks_to_request(
        &self,
        request_id: &str,
        tasks: &[TaskInput],
    ) -> PlannerResult<AddTasksResult> {
        let tasks = normalize_tasks(tasks)?;

        let (request, added) = {
            let _guard = self.write_lock.lock().await;
            let mut request = self.load(request_id).await?;
            let added = lifecycle::append_tasks(&mut request, tasks)?;
            self.save(&request).await?;
            (request, added)
        };

        info!(request_id, added = added.len(), "Tasks added to request");
        self.notifier.notify(UpdateMessage::TasksAdded {
            request_id: request.id.clone(),
            task_ids: lifecycle::task_ids(&added),
        });

        Ok(AddTasksResult {
            message: format!("{} task(s) added.", added.len()),
            added_tasks: added,
            tasks_progress: tasks_progress(&request),
            progress_table: render_table(&request),
        })
    }

    pub async fn update_task(
        &self,
        request_id: &str,
        task_id: &str,
        title: Option<String>,
        description: Option<String>,
    ) -> PlannerResult<TaskResult> {
        let (request, task) = {
            let _guard = self.write_lock.lock().await;
            let mut request = self.load(request_id).await?;
            let task = lifecycle::edit_task(&mut request, task_id, title, description)?;
            self.save(&request).await?;
            (request, task)
        };

        info!(request_id, task_id, "Task updated");
        self.notifier.notify(UpdateMessage::TaskUpdated {
            request_id: request.id.clone(),
            task_id: task.id.clone(),
        });

        Ok(TaskResult {
            message: format!("Task '{}' updated.", task.title),
            task,
            tasks_progress: tasks_progress(&request),
            progress_table: render_table(&request),
        })
    }

    pub async fn delete_task(
        &self,
        request_id: &str,
        task_id: &str,
    ) -> PlannerResult<DeleteTaskResult> {
        let (request, removed) = {
            let _guard = self.write_lock.lock().await;
            let mut request = self.load(request_id).await?;
            let removed = lifecycle::remove_task(&mut request, task_id)?;
            self.save(&request).await?;
            (request, removed)
        };

        info!(request_id, task_id, "Task deleted");
        self.notifier.notify(UpdateMessage::TaskDeleted {
            request_id: request.id.clone(),
            task_id: removed.id.clone(),
        });

        Ok(DeleteTaskResult {
            message: format!("Task '{}' deleted.", removed.title),
            deleted_task_id: removed.id,
            tasks_progress: tasks_progress(&request),
            progress_table: render_table(&request),
        })
    }

    /// Summaries of every request in insertion order.
    pub async fn list_requests(&self) -> PlannerResult<ListRequestsResult> {
        let requests: Vec<RequestSummary> = self
            .db
            .requests()
            .list()
            .await?
            .iter()
            .map(RequestSummary::from)
            .collect();

        Ok(ListRequestsResult {
            total: requests.len(),
            requests,
        })
    }

    /// Look a task up by id alone.
    pub async fn open_task_details(&self, task_id: &str) -> PlannerResult<TaskDetails> {
        let owner = self
            .db
            .requests()
            .find_task_owner(task_id)
            .await?
            .ok_or_else(|| PlannerError::task_not_found(task_id))?;

        let request = self.load(&owner).await?;
        let task = request.task(task_id).cloned().ok_or_else(|| {
            warn!(task_id, request_id = %owner, "Task index points at a request without the task");
            PlannerError::task_not_found(task_id)
        })?;

        Ok(TaskDetails {
            task,
            original_request: request.original_request,
        })
    }

    /// Remove every request and task.
    pub async fn clear_all_data(&self, confirmation: &str) -> PlannerResult<ClearResult> {
        if confirmation != CLEAR_CONFIRMATION {
            return Err(PlannerError::validation(format!(
                "confirmation must be \"{}\"",
                CLEAR_CONFIRMATION
            )));
        }

        let removed = {
            let _guard = self.write_lock.lock().await;
            self.db.requests().clear().await?
        };

        warn!(removed, "All planner data cleared");
        self.notifier.notify(UpdateMessage::DataCleared {
            removed_requests: removed,
        });

        Ok(ClearResult {
            message: format!("Removed {} request(s) and their tasks.", removed),
            removed_requests: removed,
        })
    }
}
