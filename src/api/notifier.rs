//! Change notification system for broadcasting planner updates to WebSocket clients.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages broadcast after a planner operation changed stored state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum UpdateMessage {
    // Requests
    RequestCreated { request_id: String },
    RequestCompleted { request_id: String },

    // Tasks
    TasksAdded {
        request_id: String,
        task_ids: Vec<String>,
    },
    TaskUpdated { request_id: String, task_id: String },
    TaskDone { request_id: String, task_id: String },
    TaskApproved { request_id: String, task_id: String },
    TaskDeleted { request_id: String, task_id: String },

    // Maintenance
    DataCleared { removed_requests: usize },
}

/// Pub/sub notifier for broadcasting planner changes to all subscribers.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<UpdateMessage>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    /// Create a new ChangeNotifier with a buffer of 100 messages.
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self { tx }
    }

    /// Subscribe to receive update notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<UpdateMessage> {
        self.tx.subscribe()
    }

    /// Broadcast an update message to all subscribers.
    pub fn notify(&self, msg: UpdateMessage) {
        let _ = self.tx.send(msg);
    }
}
