//! Planner error types.
//!
//! Every failure a planner operation can produce maps onto one of these
//! variants. Transports render them into their own envelopes using
//! [`PlannerError::kind`] and [`PlannerError::rpc_code`].

use miette::Diagnostic;
use thiserror::Error;

use crate::db::DbError;

#[derive(Error, Diagnostic, Debug)]
pub enum PlannerError {
    #[error("{message}")]
    #[diagnostic(code(taskplan::planner::validation))]
    Validation { message: String },

    #[error("{entity} not found: {id}")]
    #[diagnostic(code(taskplan::planner::not_found))]
    NotFound { entity: String, id: String },

    #[error("{message}")]
    #[diagnostic(code(taskplan::planner::invalid_state))]
    InvalidState { message: String },

    #[error("Unknown tool: {name}")]
    #[diagnostic(
        code(taskplan::planner::unknown_tool),
        help("List the available tools with GET /tools or the tools/list method")
    )]
    UnknownTool { name: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Storage(DbError),
}

impl PlannerError {
    pub fn validation(message: impl Into<String>) -> Self {
        PlannerError::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        PlannerError::InvalidState {
            message: message.into(),
        }
    }

    pub fn request_not_found(id: &str) -> Self {
        PlannerError::NotFound {
            entity: "Request".to_string(),
            id: id.to_string(),
        }
    }

    pub fn task_not_found(id: &str) -> Self {
        PlannerError::NotFound {
            entity: "Task".to_string(),
            id: id.to_string(),
        }
    }

    /// Stable error kind name reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            PlannerError::Validation { .. } => "ValidationError",
            PlannerError::NotFound { .. } => "NotFoundError",
            PlannerError::InvalidState { .. } => "InvalidStateError",
            PlannerError::UnknownTool { .. } => "UnknownToolError",
            PlannerError::Storage(_) => "StorageError",
        }
    }

    /// JSON-RPC 2.0 error code.
    pub fn rpc_code(&self) -> i64 {
        match self {
            PlannerError::Validation { .. } => -32602,
            PlannerError::NotFound { .. } => -32001,
            PlannerError::InvalidState { .. } => -32002,
            PlannerError::UnknownTool { .. } => -32601,
            PlannerError::Storage(_) => -32603,
        }
    }
}

impl From<DbError> for PlannerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity_type, id } => PlannerError::NotFound {
                entity: entity_type,
                id,
            },
            other => PlannerError::Storage(other),
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
