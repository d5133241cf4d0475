//! State transitions for requests and tasks.
//!
//! Each function works on an in-memory [`Request`] and either applies the
//! whole transition or returns an error leaving the request untouched.
//! Persisting the result is the caller's job.

use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{Id, Request, RequestStatus, Task, TaskStatus};

use super::error::{PlannerError, PlannerResult};
use super::input::NewTask;

/// Build a new pending request with freshly generated ids.
pub fn new_request(
    original_request: String,
    split_details: Option<String>,
    tasks: Vec<NewTask>,
) -> Request {
    let now = current_timestamp();
    let id = generate_entity_id();
    let tasks = tasks.into_iter().map(|t| build_task(&id, t)).collect();

    Request {
        id,
        original_request,
        split_details,
        status: RequestStatus::Pending,
        tasks,
        created_at: now,
        updated_at: now,
    }
}

fn build_task(request_id: &str, new: NewTask) -> Task {
    let now = current_timestamp();
    Task {
        id: generate_entity_id(),
        request_id: request_id.to_string(),
        title: new.title,
        description: new.description,
        status: TaskStatus::Pending,
        approved: false,
        completed_details: None,
        created_at: now,
        updated_at: now,
        completed_at: None,
        approved_at: None,
    }
}

/// First pending task in execution order.
pub fn next_pending(request: &Request) -> Option<&Task> {
    request
        .tasks
        .iter()
        .find(|t| t.status == TaskStatus::Pending)
}

/// True when every task is done and approved.
pub fn all_tasks_approved(request: &Request) -> bool {
    request
        .tasks
        .iter()
        .all(|t| t.status == TaskStatus::Done && t.approved)
}

fn task_mut<'a>(request: &'a mut Request, task_id: &str) -> PlannerResult<&'a mut Task> {
    request
        .task_mut(task_id)
        .ok_or_else(|| PlannerError::task_not_found(task_id))
}

pub fn mark_done(
    request: &mut Request,
    task_id: &str,
    completed_details: Option<String>,
) -> PlannerResult<Task> {
    let now = current_timestamp();
    let task = task_mut(request, task_id)?;
    if task.status == TaskStatus::Done {
        return Err(PlannerError::invalid_state(format!(
            "Task '{}' is already done",
            task.title
        )));
    }

    task.status = TaskStatus::Done;
    task.completed_at = Some(now);
    task.completed_details = completed_details;
    task.updated_at = now;
    let done = task.clone();

    request.updated_at = now;
    Ok(done)
}

pub fn approve_task(request: &mut Request, task_id: &str) -> PlannerResult<Task> {
    let now = current_timestamp();
    let task = task_mut(request, task_id)?;
    if task.status != TaskStatus::Done {
        return Err(PlannerError::invalid_state(format!(
            "Task '{}' must be marked done before it can be approved",
            task.title
        )));
    }
    if task.approved {
        return Err(PlannerError::invalid_state(format!(
            "Task '{}' is already approved",
            task.title
        )));
    }

    task.approved = true;
    task.approved_at = Some(now);
    task.updated_at = now;
    let approved = task.clone();

    request.updated_at = now;
    Ok(approved)
}

pub fn complete_request(request: &mut Request) -> PlannerResult<()> {
    if request.status == RequestStatus::Completed {
        return Err(PlannerError::invalid_state(format!(
            "Request {} is already completed",
            request.id
        )));
    }

    let outstanding: Vec<String> = request
        .tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Done || !t.approved)
        .map(|t| {
            let state = if t.status == TaskStatus::Done {
                "not approved"
            } else {
                "not done"
            };
            format!("'{}' ({}, {})", t.title, t.id, state)
        })
        .collect();

    if !outstanding.is_empty() {
        return Err(PlannerError::invalid_state(format!(
            "All tasks must be done and approved before the request can be completed. Outstanding: {}",
            outstanding.join(", ")
        )));
    }

    request.status = RequestStatus::Completed;
    request.updated_at = current_timestamp();
    Ok(())
}

/// Append tasks in order and return copies of the new entries.
pub fn append_tasks(request: &mut Request, tasks: Vec<NewTask>) -> PlannerResult<Vec<Task>> {
    if request.status == RequestStatus::Completed {
        return Err(PlannerError::invalid_state(format!(
            "Cannot add tasks to completed request {}",
            request.id
        )));
    }

    let added: Vec<Task> = tasks
        .into_iter()
        .map(|t| build_task(&request.id, t))
        .collect();
    request.tasks.extend(added.iter().cloned());
    request.updated_at = current_timestamp();
    Ok(added)
}

pub fn edit_task(
    request: &mut Request,
    task_id: &str,
    title: Option<String>,
    description: Option<String>,
) -> PlannerResult<Task> {
    let now = current_timestamp();
    let task = task_mut(request, task_id)?;
    if task.status == TaskStatus::Done {
        return Err(PlannerError::invalid_state(format!(
            "Task '{}' is done and can no longer be edited",
            task.title
        )));
    }
    if title.is_none() && description.is_none() {
        return Err(PlannerError::validation(
            "update_task needs a title or a description",
        ));
    }
    if title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(PlannerError::validation("title must not be blank"));
    }

    if let Some(title) = title {
        task.title = title;
    }
    if let Some(description) = description {
        task.description = description;
    }
    task.updated_at = now;
    let edited = task.clone();

    request.updated_at = now;
    Ok(edited)
}

/// Remove a pending task, returning it.
pub fn remove_task(request: &mut Request, task_id: &str) -> PlannerResult<Task> {
    let position = request
        .tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| PlannerError::task_not_found(task_id))?;

    let task = &request.tasks[position];
    if task.status == TaskStatus::Done {
        return Err(PlannerError::invalid_state(format!(
            "Task '{}' is done and cannot be deleted",
            task.title
        )));
    }
    if request.tasks.len() == 1 {
        return Err(PlannerError::invalid_state(format!(
            "Task '{}' is the last task of request {}",
            task.title, request.id
        )));
    }

    let removed = request.tasks.remove(position);
    request.updated_at = current_timestamp();
    Ok(removed)
}

/// Ids of the given tasks, in order.
pub fn task_ids(tasks: &[Task]) -> Vec<Id> {
    tasks.iter().map(|t| t.id.clone()).collect()
}
