//! MCP Streamable HTTP service creation
//!
//! This module provides functions to create the MCP service
//! that can be integrated with an Axum router.

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::db::Database;
use crate::planner::Planner;

use super::server::McpServer;

/// Create MCP Streamable HTTP service
///
/// The returned service implements `tower::Service` and is meant to be
/// nested into an axum router with `nest_service("/mcp", ...)`.
pub fn create_mcp_service<D: Database + 'static>(
    planner: Arc<Planner<D>>,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<McpServer<D>, LocalSessionManager> {
    // Service factory: creates new McpServer instance per session
    // Note: Returns io::Error to match rmcp's expected signature
    let service_factory = move || -> Result<McpServer<D>, std::io::Error> {
        Ok(McpServer::new(Arc::clone(&planner)))
    };

    let config = StreamableHttpServerConfig::default()
        .with_sse_keep_alive(None) // Use default (15s)
        .with_sse_retry(None)
        .with_stateful_mode(true)
        .with_cancellation_token(cancellation_token);

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}
