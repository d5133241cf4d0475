//! WebSocket handler for JSON-RPC calls and real-time updates.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use super::rpc::handle_message;
use super::state::AppState;
use crate::db::Database;

/// WebSocket upgrade handler.
///
/// Once upgraded, every text frame is answered as a JSON-RPC request and
/// every planner change is pushed as an `UpdateMessage`.
pub async fn ws_handler<D: Database + 'static>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<D>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket<D: Database>(socket: WebSocket, state: AppState<D>) {
    info!("WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.notifier().subscribe();

    loop {
        tokio::select! {
            // Requests from the client
            Some(msg) = receiver.next() => {
                let reply = match msg {
                    Ok(Message::Text(text)) => {
                        debug!("Received from client: {}", text.as_str());
                        handle_message(state.planner(), text.as_str().as_bytes()).await
                    }
                    Ok(Message::Binary(bytes)) => handle_message(state.planner(), &bytes).await,
                    Ok(Message::Close(_)) => {
                        info!("Client closed connection");
                        break;
                    }
                    Err(e) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    _ => None,
                };

                let Some(reply) = reply else { continue };
                if let Err(e) = sender.send(Message::Text(reply.to_string().into())).await {
                    error!("Failed to send reply: {}", e);
                    break;
                }
            }

            // Planner changes
            update = rx.recv() => {
                let update = match update {
                    Ok(update) => update,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client lagging, dropped updates");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                let json = match serde_json::to_string(&update) {
                    Ok(j) => j,
                    Err(e) => {
                        error!("Failed to serialize update: {}", e);
                        continue;
                    }
                };

                if let Err(e) = sender.send(Message::Text(json.into())).await {
                    error!("Failed to send update: {}", e);
                    break;
                }
            }

            else => break,
        }
    }

    info!("WebSocket client disconnected");
}
