//! HTTP handlers.

mod requests;
mod rpc;
mod system;
mod tools;

use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

use crate::planner::PlannerError;

pub use requests::*;
pub use rpc::*;
pub use system::*;
pub use tools::*;

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Request not found: req-1")]
    pub error: String,
}

/// HTTP status for a planner error.
pub(crate) fn status_for(err: &PlannerError) -> StatusCode {
    match err {
        PlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
        PlannerError::NotFound { .. } | PlannerError::UnknownTool { .. } => StatusCode::NOT_FOUND,
        PlannerError::InvalidState { .. } => StatusCode::CONFLICT,
        PlannerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
