//! Application state for the API server.

use std::sync::Arc;

use super::notifier::ChangeNotifier;
use crate::db::Database;
use crate::planner::Planner;

/// Shared application state.
///
/// Every transport reaches storage through the same planner, so the
/// planner's write lock covers HTTP, JSON-RPC, WebSocket and MCP callers.
pub struct AppState<D: Database> {
    planner: Arc<Planner<D>>,
}

// Manual Clone impl - we only need Arc to be cloneable, not D
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
        }
    }
}

impl<D: Database> AppState<D> {
    pub fn new(planner: Arc<Planner<D>>) -> Self {
        Self { planner }
    }

    /// Get a reference to the planner.
    pub fn planner(&self) -> &Planner<D> {
        &self.planner
    }

    /// Get a cloned Arc to the planner.
    ///
    /// Useful for handing the planner to services that outlive a request,
    /// such as the MCP session factory.
    pub fn planner_arc(&self) -> Arc<Planner<D>> {
        Arc::clone(&self.planner)
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        self.planner.db()
    }

    /// Get a reference to the change notifier.
    pub fn notifier(&self) -> &ChangeNotifier {
        self.planner.notifier()
    }
}
