pub mod request;
pub mod task;
pub mod tool;

use serde_json::{Map, Value};

use crate::cli::error::CliResult;
use crate::cli::utils::to_json;

/// Render an operation result: the raw fields for `json`, otherwise the
/// message followed by the progress table when present.
pub(crate) fn render_outcome(result: &Map<String, Value>, format: &str) -> CliResult<String> {
    match format {
        "json" => to_json(result),
        _ => {
            let mut output = result
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if let Some(table) = result.get("progressTable").and_then(Value::as_str) {
                output.push_str("\n\n");
                output.push_str(table);
            }
            Ok(output)
        }
    }
}


#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;


#[cfg(test)]
pub(crate) mod test_server {
    use std::sync::Arc;

    use tokio::net::TcpListener;
    use tokio_util::sync::CancellationToken;

    use crate::api::notifier::ChangeNotifier;
    use crate::api::{AppState, create_router};
    use crate::db::MemoryDatabase;
    use crate::planner::Planner;

    /// Spawn a test HTTP server over an in-memory store
    pub(crate) async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
        let planner = Planner::new(MemoryDatabase::new(), ChangeNotifier::new());
        let app = create_router(AppState::new(Arc::new(planner)), CancellationToken::new());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give server time to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        (url, handle)
    }
}
