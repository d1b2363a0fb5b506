//! WebSocket presentation adapter.
//!
//! One long-lived connection per viewer: subscribes to the hub, forwards
//! change events re-rendered through the tree builder, and unsubscribes on
//! disconnect or any socket error. The initial `{"type":"connected"}`
//! message and the `{"type":"file_changed","file":...}` shape are the wire
//! contract for viewer clients.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;

use crate::{debug_event, tree};

use super::router::AppState;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut subscription = state.hub.subscribe();
    let id = subscription.id();
    debug_event!("ws", "connected", "viewer {id}");

    let connected = serde_json::json!({ "type": "connected" }).to_string();
    if socket.send(Message::Text(connected.into())).await.is_err() {
        state.hub.unsubscribe(id);
        return;
    }

    loop {
        tokio::select! {
            changed = subscription.recv() => {
                let Some(path) = changed else {
                    // Hub closed the mailbox (watcher shutdown)
                    break;
                };

                // Render failures skip this push, never kill the connection
                let doc = match tree::render_document(&path) {
                    Ok(doc) => doc,
                    Err(e) => {
                        tracing::warn!("[ws] render failed for {}: {e}", path.display());
                        continue;
                    }
                };

                let msg = serde_json::json!({
                    "type": "file_changed",
                    "file": doc,
                })
                .to_string();

                if socket.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    // Viewers don't speak; drain pings and ignore chatter
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
        }
    }

    state.hub.unsubscribe(id);
    debug_event!("ws", "disconnected", "viewer {id}");
}
