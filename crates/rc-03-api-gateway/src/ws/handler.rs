//! WebSocket connection handling.
//!
//! The socket is split: a writer task drains the subscriber queue into the
//! sink with a per-frame timeout, while the reader side only watches for the
//! client going away. Inbound text and binary frames are ignored.

use crate::domain::config::WebSocketConfig;
use crate::router::AppState;
use crate::ws::hub::{BroadcastHub, Subscriber};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use rc_01_replication::FatalWatcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// `GET /ws`
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let hub = Arc::clone(&state.hub);
    let config = state.websocket.clone();
    let fatal = state.fatal.clone();
    ws.on_upgrade(move |socket| serve_connection(socket, hub, config, fatal))
}

/// Register the socket with the hub and pump push messages until either side
/// goes away.
pub async fn serve_connection(
    socket: WebSocket,
    hub: Arc<BroadcastHub>,
    config: WebSocketConfig,
    mut fatal: FatalWatcher,
) {
    let Subscriber { id, mut messages } = hub.register();
    info!(connection_id = id, "WebSocket subscriber connected");

    let (mut sink, mut stream) = socket.split();
    let write_timeout = config.write_timeout();

    let mut writer = tokio::spawn(async move {
        while let Some(frame) = messages.recv().await {
            let send = sink.send(Message::Text(frame.to_string()));
            match tokio::time::timeout(write_timeout, send).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    debug!(connection_id = id, error = %e, "WebSocket write failed");
                    return;
                }
                Err(_) => {
                    warn!(
                        connection_id = id,
                        timeout_ms = write_timeout.as_millis() as u64,
                        "WebSocket write timed out"
                    );
                    return;
                }
            }
        }
        // Queue closed: the hub evicted this subscriber.
        let _ = tokio::time::timeout(Duration::from_secs(1), sink.close()).await;
    });

    loop {
        tokio::select! {
            _ = &mut writer => break,
            _ = fatal.wait() => break,
            frame = stream.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(connection_id = id, error = %e, "WebSocket read failed");
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    hub.unregister(id);
    writer.abort();
    info!(connection_id = id, "WebSocket subscriber disconnected");
}
