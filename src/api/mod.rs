//! HTTP API server.
//!
//! One axum router serves every transport over a shared
//! [`Planner`](crate::planner::Planner): the `/invoke` tool envelope,
//! JSON-RPC 2.0, the WebSocket feed, read-only REST views and the MCP mount.

mod handlers;
pub mod notifier;
mod routes;
pub mod rpc;
mod state;
mod websocket;

#[cfg(test)]
mod notifier_test;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;
use crate::planner::Planner;

pub use notifier::{ChangeNotifier, UpdateMessage};
pub use routes::create_router;
pub use state::AppState;

/// Default port for the API server and the CLI client.
pub const DEFAULT_PORT: u16 = 3737;

/// API server configuration
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {message}")]
    #[diagnostic(
        code(taskplan::api::bind),
        help("Is another process already listening on this port?")
    )]
    Bind { addr: String, message: String },

    #[error("Server error: {0}")]
    #[diagnostic(code(taskplan::api::serve))]
    Serve(#[from] std::io::Error),
}

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskplan=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

async fn shutdown_signal(ct: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
    ct.cancel();
}

/// Run the API server with the given configuration and storage backend.
///
/// The backend must already be migrated.
pub async fn run<D: Database + 'static>(config: Config, db: D) -> Result<(), ApiError> {
    init_tracing();

    let planner = Arc::new(Planner::new(db, ChangeNotifier::new()));
    let state = AppState::new(planner);
    let ct = CancellationToken::new();

    let app = create_router(state, ct.clone()).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::Bind {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;
    info!("API server listening on http://{}", addr);
    info!("API docs available at http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(ct))
        .await?;

    info!("API server stopped");
    Ok(())
}
