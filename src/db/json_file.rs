//! JSON document store implementation of the database traits.
//!
//! State lives in two files inside the data directory:
//!
//! - `requests.json`: object keyed by request ID; each entry carries the
//!   ordered list of its task IDs.
//! - `tasks.json`: object keyed by task ID; each entry carries every task
//!   field plus `requestId`, which doubles as the task -> request index.
//!
//! Both maps keep insertion order. Files are replaced atomically via a
//! temporary file and rename, and only after a write succeeds does the
//! in-memory copy change.
//!
//! A save writes `tasks.json` first, holding every old and new task, and
//! then `requests.json`, which is the commit point. Stale tasks are pruned
//! by a final `tasks.json` write. Tasks not referenced by their request
//! are dropped on open, so an interrupted save never leaves a request
//! pointing at tasks that were not written.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::db::{
    Database, DbError, DbResult, Id, Request, RequestRepository, RequestStatus, Task,
};

pub const REQUESTS_FILE: &str = "requests.json";
pub const TASKS_FILE: &str = "tasks.json";

/// Request entry as stored in `requests.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRequest {
    id: Id,
    original_request: String,
    split_details: Option<String>,
    status: RequestStatus,
    tasks: Vec<Id>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Request> for StoredRequest {
    fn from(r: &Request) -> Self {
        Self {
            id: r.id.clone(),
            original_request: r.original_request.clone(),
            split_details: r.split_details.clone(),
            status: r.status,
            tasks: r.tasks.iter().map(|t| t.id.clone()).collect(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct FileState {
    requests: IndexMap<Id, StoredRequest>,
    tasks: IndexMap<Id, Task>,
}

impl FileState {
    fn assemble(&self, stored: &StoredRequest) -> Request {
        let tasks = stored
            .tasks
            .iter()
            .filter_map(|task_id| {
                let task = self.tasks.get(task_id).cloned();
                if task.is_none() {
                    warn!(request_id = %stored.id, task_id = %task_id, "Dangling task reference in requests.json");
                }
                task
            })
            .collect();

        Request {
            id: stored.id.clone(),
            original_request: stored.original_request.clone(),
            split_details: stored.split_details.clone(),
            status: stored.status,
            tasks,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

/// File-backed database keeping a write-through in-memory copy.
pub struct JsonFileDatabase {
    dir: PathBuf,
    state: RwLock<FileState>,
}

impl JsonFileDatabase {
    /// Open (or initialise) the store in `dir`.
    ///
    /// Missing files are treated as empty collections. Unparseable files are
    /// an error rather than being silently replaced.
    pub async fn open<P: AsRef<Path>>(dir: P) -> DbResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, e))?;

        let requests: IndexMap<Id, StoredRequest> =
            read_collection(&dir.join(REQUESTS_FILE)).await?;
        let mut tasks: IndexMap<Id, Task> = read_collection(&dir.join(TASKS_FILE)).await?;

        let before = tasks.len();
        tasks.retain(|task_id, task| {
            requests
                .get(&task.request_id)
                .is_some_and(|owner| owner.tasks.contains(task_id))
        });
        if tasks.len() != before {
            warn!(dropped = before - tasks.len(), "Dropped orphaned entries from tasks.json");
        }

        debug!(dir = %dir.display(), "Opened JSON file store");

        Ok(Self {
            dir,
            state: RwLock::new(FileState { requests, tasks }),
        })
    }

    /// Directory holding the JSON files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `staged_tasks`, then the requests of `next`, then prune
    /// `tasks.json` down to `next.tasks` when they differ.
    ///
    /// Once `requests.json` is replaced the change is committed; a failed
    /// prune only leaves orphans that the next open drops.
    async fn commit(&self, staged_tasks: &IndexMap<Id, Task>, next: &FileState) -> DbResult<()> {
        let tasks_path = self.dir.join(TASKS_FILE);
        write_collection(&tasks_path, staged_tasks).await?;
        write_collection(&self.dir.join(REQUESTS_FILE), &next.requests).await?;

        if staged_tasks.len() != next.tasks.len() {
            if let Err(e) = write_collection(&tasks_path, &next.tasks).await {
                warn!(error = %e, "Failed to prune tasks.json; orphans are dropped on next open");
            }
        }
        Ok(())
    }
}

impl Database for JsonFileDatabase {
    type Requests<'a> = JsonFileRequestRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        // Materialise both files so the layout exists on first start.
        let state = self.state.read().await;
        self.commit(&state.tasks, &state).await
    }

    fn requests(&self) -> Self::Requests<'_> {
        JsonFileRequestRepository { db: self }
    }
}

/// Request repository over [`JsonFileDatabase`].
pub struct JsonFileRequestRepository<'a> {
    db: &'a JsonFileDatabase,
}

impl RequestRepository for JsonFileRequestRepository<'_> {
    async fn load(&self, id: &str) -> DbResult<Request> {
        let state = self.db.state.read().await;
        state
            .requests
            .get(id)
            .map(|stored| state.assemble(stored))
            .ok_or_else(|| DbError::request_not_found(id))
    }

    async fn save(&self, request: &Request) -> DbResult<()> {
        let mut state = self.db.state.write().await;

        let mut staged_tasks = state.tasks.clone();
        for task in &request.tasks {
            staged_tasks.insert(task.id.clone(), task.clone());
        }

        let mut next = FileState {
            requests: state.requests.clone(),
            tasks: staged_tasks.clone(),
        };
        if let Some(previous) = next.requests.get(&request.id) {
            for task_id in previous.tasks.iter().filter(|id| request.task(id).is_none()) {
                next.tasks.shift_remove(task_id);
            }
        }
        next.requests
            .insert(request.id.clone(), StoredRequest::from(request));

        self.db.commit(&staged_tasks, &next).await?;
        *state = next;
        Ok(())
    }

    async fn list(&self) -> DbResult<Vec<Request>> {
        let state = self.db.state.read().await;
        Ok(state
            .requests
            .values()
            .map(|stored| state.assemble(stored))
            .collect())
    }

    async fn find_task_owner(&self, task_id: &str) -> DbResult<Option<Id>> {
        let state = self.db.state.read().await;
        Ok(state.tasks.get(task_id).map(|t| t.request_id.clone()))
    }

    async fn clear(&self) -> DbResult<usize> {
        let mut state = self.db.state.write().await;
        let removed = state.requests.len();
        let next = FileState::default();
        // Emptying requests.json commits; leftover tasks become orphans.
        self.db.commit(&state.tasks, &next).await?;
        *state = next;
        Ok(removed)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> DbError {
    DbError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

async fn read_collection<T: DeserializeOwned>(path: &Path) -> DbResult<IndexMap<Id, T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(IndexMap::new()),
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| DbError::Serialization {
            message: format!("{}: {}", path.display(), e),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(IndexMap::new()),
        Err(e) => Err(io_error(path, e)),
    }
}

async fn write_collection<T: Serialize>(path: &Path, collection: &IndexMap<Id, T>) -> DbResult<()> {
    let json = serde_json::to_vec_pretty(collection).map_err(|e| DbError::Serialization {
        message: e.to_string(),
    })?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| io_error(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error(path, e))
}
