//! In-memory implementation of the database traits.
//!
//! Used by tests and by `--store memory`. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::db::{Database, DbError, DbResult, Id, Request, RequestRepository};

#[derive(Debug, Default)]
struct MemoryState {
    /// Request IDs in insertion order.
    order: Vec<Id>,
    requests: HashMap<Id, Request>,
    /// Task ID -> owning request ID.
    task_index: HashMap<Id, Id>,
}

/// In-memory database.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    state: RwLock<MemoryState>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DbResult<RwLockReadGuard<'_, MemoryState>> {
        self.state.read().map_err(|e| DbError::Database {
            message: format!("Failed to acquire database lock: {}", e),
        })
    }

    fn write(&self) -> DbResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state.write().map_err(|e| DbError::Database {
            message: format!("Failed to acquire database lock: {}", e),
        })
    }
}

impl Database for MemoryDatabase {
    type Requests<'a> = MemoryRequestRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        Ok(())
    }

    fn requests(&self) -> Self::Requests<'_> {
        MemoryRequestRepository { db: self }
    }
}

/// Request repository over [`MemoryDatabase`].
pub struct MemoryRequestRepository<'a> {
    db: &'a MemoryDatabase,
}

impl RequestRepository for MemoryRequestRepository<'_> {
    async fn load(&self, id: &str) -> DbResult<Request> {
        let state = self.db.read()?;
        state
            .requests
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::request_not_found(id))
    }

    async fn save(&self, request: &Request) -> DbResult<()> {
        let mut guard = self.db.write()?;
        let state = &mut *guard;

        match state.requests.get(&request.id) {
            Some(previous) => {
                for task in &previous.tasks {
                    if state.task_index.get(&task.id) == Some(&request.id) {
                        state.task_index.remove(&task.id);
                    }
                }
            }
            None => state.order.push(request.id.clone()),
        }

        for task in &request.tasks {
            state
                .task_index
                .insert(task.id.clone(), request.id.clone());
        }
        state.requests.insert(request.id.clone(), request.clone());

        Ok(())
    }

    async fn list(&self) -> DbResult<Vec<Request>> {
        let state = self.db.read()?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.requests.get(id).cloned())
            .collect())
    }

    async fn find_task_owner(&self, task_id: &str) -> DbResult<Option<Id>> {
        let state = self.db.read()?;
        Ok(state.task_index.get(task_id).cloned())
    }

    async fn clear(&self) -> DbResult<usize> {
        let mut state = self.db.write()?;
        let removed = state.requests.len();
        *state = MemoryState::default();
        Ok(removed)
    }
}
