//! API route configuration.

use axum::Router;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{
    self, ErrorResponse, HealthResponse, InvokeRequest, RequestList, RequestResponse,
    TaskDetailsResponse, TaskResponse, ToolResponse,
};
use super::state::AppState;
use super::websocket::ws_handler;
use crate::db::Database;
use crate::mcp::create_mcp_service;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "taskplan API",
        version = "0.1.0",
        description = "Request planning and task approval workflow for LLM agents",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::root,
        handlers::health,
        handlers::list_tools,
        handlers::invoke,
        handlers::rpc,
        handlers::list_requests,
        handlers::get_request,
        handlers::get_task,
    ),
    components(
        schemas(
            HealthResponse,
            ToolResponse,
            InvokeRequest,
            RequestList,
            RequestResponse,
            TaskResponse,
            TaskDetailsResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "tools", description = "Tool catalogue and invocation"),
        (name = "rpc", description = "JSON-RPC 2.0 endpoint"),
        (name = "requests", description = "Read-only request and task views")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation and the MCP mount.
///
/// `ct` stops open MCP sessions when the server shuts down.
pub fn create_router<D: Database + 'static>(state: AppState<D>, ct: CancellationToken) -> Router {
    let api = ApiDoc::openapi();
    let mcp_service = create_mcp_service(state.planner_arc(), ct);

    // System routes (non-generic)
    let system_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/tools", get(handlers::list_tools));

    // Tool and JSON-RPC routes (generic over Database)
    let tool_routes = routes!(D => {
        post "/invoke" => handlers::invoke,
        post "/rpc" => handlers::rpc,
    })
    .route("/", get(handlers::root).post(handlers::rpc::<D>));

    // Read-only views (generic over Database)
    let view_routes = routes!(D => {
        get "/api/v1/requests" => handlers::list_requests,
        get "/api/v1/requests/{id}" => handlers::get_request,
        get "/api/v1/tasks/{id}" => handlers::get_task,
    });

    system_routes
        .merge(tool_routes)
        .merge(view_routes)
        .route("/ws", get(ws_handler::<D>))
        .nest_service("/mcp", mcp_service)
        .merge(Scalar::with_url("/docs", api))
        .with_state(state)
}
