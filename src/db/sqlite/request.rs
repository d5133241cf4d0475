//! SQLite RequestRepository implementation.

use std::collections::HashMap;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::{
    DbError, DbResult, Id, Request, RequestRepository, RequestStatus, Task, TaskStatus,
};

const REQUEST_COLUMNS: &str =
    "id, original_request, split_details, status, created_at, updated_at";
const TASK_COLUMNS: &str = "id, request_id, title, description, status, approved, completed_details, created_at, updated_at, completed_at, approved_at";

/// SQLx-backed request repository.
pub struct SqliteRequestRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl RequestRepository for SqliteRequestRepository<'_> {
    async fn load(&self, id: &str) -> DbResult<Request> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM request WHERE id = ?",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(db_error)?;

        let row = row.ok_or_else(|| DbError::request_not_found(id))?;

        let task_rows = sqlx::query(&format!(
            "SELECT {} FROM task WHERE request_id = ? ORDER BY position",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await
        .map_err(db_error)?;

        let tasks = task_rows
            .iter()
            .map(row_to_task)
            .collect::<DbResult<Vec<_>>>()?;

        row_to_request(&row, tasks)
    }

    async fn save(&self, request: &Request) -> DbResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO request (id, original_request, split_details, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                original_request = excluded.original_request,
                split_details = excluded.split_details,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&request.id)
        .bind(&request.original_request)
        .bind(&request.split_details)
        .bind(request.status.to_string())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        // Replace the task list wholesale; positions follow vector order.
        sqlx::query("DELETE FROM task WHERE request_id = ?")
            .bind(&request.id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        for (position, task) in request.tasks.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO task (id, request_id, position, title, description, status, approved,
                                  completed_details, created_at, updated_at, completed_at, approved_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&task.id)
            .bind(&request.id)
            .bind(position as i64)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.to_string())
            .bind(task.approved)
            .bind(&task.completed_details)
            .bind(task.created_at)
            .bind(task.updated_at)
            .bind(task.completed_at)
            .bind(task.approved_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)
    }

    async fn list(&self) -> DbResult<Vec<Request>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM request ORDER BY rowid",
            REQUEST_COLUMNS
        ))
        .fetch_all(self.pool)
        .await
        .map_err(db_error)?;

        let task_rows = sqlx::query(&format!(
            "SELECT {} FROM task ORDER BY request_id, position",
            TASK_COLUMNS
        ))
        .fetch_all(self.pool)
        .await
        .map_err(db_error)?;

        let mut tasks_by_request: HashMap<Id, Vec<Task>> = HashMap::new();
        for row in &task_rows {
            let task = row_to_task(row)?;
            tasks_by_request
                .entry(task.request_id.clone())
                .or_default()
                .push(task);
        }

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(db_error)?;
                let tasks = tasks_by_request.remove(&id).unwrap_or_default();
                row_to_request(row, tasks)
            })
            .collect()
    }

    async fn find_task_owner(&self, task_id: &str) -> DbResult<Option<Id>> {
        sqlx::query_scalar("SELECT request_id FROM task WHERE id = ? LIMIT 1")
            .bind(task_id)
            .fetch_optional(self.pool)
            .await
            .map_err(db_error)
    }

    async fn clear(&self) -> DbResult<usize> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM request")
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM task")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        sqlx::query("DELETE FROM request")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(count as usize)
    }
}

fn db_error(e: sqlx::Error) -> DbError {
    DbError::Database {
        message: e.to_string(),
    }
}

/// Convert a database row to a Request model.
fn row_to_request(row: &SqliteRow, tasks: Vec<Task>) -> DbResult<Request> {
    let status: String = row.try_get("status").map_err(db_error)?;

    Ok(Request {
        id: row.try_get("id").map_err(db_error)?,
        original_request: row.try_get("original_request").map_err(db_error)?,
        split_details: row.try_get("split_details").map_err(db_error)?,
        status: RequestStatus::from_str(&status)
            .map_err(|message| DbError::Database { message })?,
        tasks,
        created_at: row.try_get("created_at").map_err(db_error)?,
        updated_at: row.try_get("updated_at").map_err(db_error)?,
    })
}

/// Convert a database row to a Task model.
fn row_to_task(row: &SqliteRow) -> DbResult<Task> {
    let status: String = row.try_get("status").map_err(db_error)?;

    Ok(Task {
        id: row.try_get("id").map_err(db_error)?,
        request_id: row.try_get("request_id").map_err(db_error)?,
        title: row.try_get("title").map_err(db_error)?,
        description: row.try_get("description").map_err(db_error)?,
        status: TaskStatus::from_str(&status).map_err(|message| DbError::Database { message })?,
        approved: row.try_get("approved").map_err(db_error)?,
        completed_details: row.try_get("completed_details").map_err(db_error)?,
        created_at: row.try_get("created_at").map_err(db_error)?,
        updated_at: row.try_get("updated_at").map_err(db_error)?,
        completed_at: row.try_get("completed_at").map_err(db_error)?,
        approved_at: row.try_get("approved_at").map_err(db_error)?,
    })
}
