//! JSON-RPC over HTTP.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::api::AppState;
use crate::api::rpc::handle_message;
use crate::db::Database;

/// JSON-RPC 2.0 endpoint
///
/// Errors are reported in the JSON-RPC envelope with HTTP 200.
/// Notifications (no `id`) are answered with 204.
#[utoipa::path(
    post,
    path = "/rpc",
    tag = "rpc",
    request_body(
        content = String,
        content_type = "application/json",
        description = "JSON-RPC 2.0 request object"
    ),
    responses(
        (status = 200, description = "JSON-RPC response"),
        (status = 204, description = "Notification accepted")
    )
)]
#[instrument(skip(state, body))]
pub async fn rpc<D: Database>(State(state): State<AppState<D>>, body: Bytes) -> Response {
    match handle_message(state.planner(), &body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
