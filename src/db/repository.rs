//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{Id, Request},
};

/// Repository for Request operations.
///
/// A request is always loaded and saved together with its ordered task list.
pub trait RequestRepository: Send + Sync {
    /// Load a request by ID.
    fn load(&self, id: &str) -> impl Future<Output = DbResult<Request>> + Send;

    /// Insert or replace a request and its complete task list.
    ///
    /// Tasks missing from `request.tasks` are removed from the store and the
    /// task index is updated in the same step.
    fn save(&self, request: &Request) -> impl Future<Output = DbResult<()>> + Send;

    /// Get all requests in insertion order.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Request>>> + Send;

    /// Look up the ID of the request owning a task.
    fn find_task_owner(&self, task_id: &str) -> impl Future<Output = DbResult<Option<Id>>> + Send;

    /// Remove every request and task. Returns the number of requests removed.
    fn clear(&self) -> impl Future<Output = DbResult<usize>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync {
    type Requests<'a>: RequestRepository
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the request repository.
    fn requests(&self) -> Self::Requests<'_>;
}
