//! WebSocket handlers for the chat relay
//!
//! Each connection gets a writer task draining its registry queue (plus a
//! periodic ping for keepalive) and a reader task decoding inbound frames and
//! broadcasting them. The connection is removed from the registry as soon as
//! either side finishes.

use crate::api::static_files;
use crate::relay::{ChatMessage, ConnectionId, ConnectionRegistry, DecodeError};
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Request, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Interval between keepalive pings
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// WebSocket upgrade handler
///
/// Upgrades unconditionally; the relay does not check the session cookie.
///
/// # Arguments
/// * `ws` - WebSocket upgrade request
/// * `state` - Application state holding the connection registry
///
/// # Returns
/// * `Response` - HTTP response initiating WebSocket connection
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let registry = state.relay.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// Root path handler
///
/// The browser client opens its socket on the bare origin, so `/` upgrades
/// when asked to and otherwise serves the client entry document.
pub async fn root_handler(
    ws: Option<WebSocketUpgrade>,
    State(state): State<AppState>,
    request: Request,
) -> Response {
    match ws {
        Some(ws) => websocket_handler(ws, State(state)).await,
        None => static_files::serve_client(&state.config.server.static_dir, request).await,
    }
}

// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, registry: Arc<ConnectionRegistry>) {
    let (mut sender, mut receiver) = socket.split();
    let (connection_id, mut outbound) = registry.register().await;

    info!(connection_id, "WebSocket client connected");

    // Greeting goes through the queue so it can't overtake a broadcast
    if !registry
        .send_to(connection_id, &ChatMessage::greeting())
        .await
    {
        error!(connection_id, "Failed to queue greeting");
    }

    // Task to forward queued frames to the socket, pinging while idle
    let mut send_task = tokio::spawn(async move {
        let mut ping = tokio::time::interval(PING_INTERVAL);
        ping.tick().await;
        loop {
            let msg = tokio::select! {
                frame = outbound.recv() => match frame {
                    Some(frame) => Message::Text(frame),
                    None => break,
                },
                _ = ping.tick() => Message::Ping(Vec::new()),
            };
            if let Err(e) = sender.send(msg).await {
                debug!(connection_id, "Failed to send message: {}", e);
                break;
            }
        }
    });

    // Receive messages
    let recv_registry = registry.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let decoded = match msg {
                Ok(Message::Text(text)) => ChatMessage::decode(&text),
                Ok(Message::Binary(bytes)) => ChatMessage::decode_bytes(&bytes),
                Ok(Message::Close(_)) => {
                    info!(connection_id, "WebSocket client disconnected");
                    break;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Err(e) => {
                    error!(connection_id, "WebSocket error: {}", e);
                    break;
                }
            };
            relay_message(&recv_registry, connection_id, decoded).await;
        }
    });

    // Wait for either side to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    registry.remove(connection_id).await;
    info!(connection_id, "WebSocket connection closed");
}

// Broadcast a decoded frame, or drop it if it failed to decode
async fn relay_message(
    registry: &ConnectionRegistry,
    connection_id: ConnectionId,
    decoded: Result<ChatMessage, DecodeError>,
) {
    let message = match decoded {
        Ok(message) => message,
        Err(e) => {
            warn!(connection_id, error = %e, "Dropping malformed chat message");
            return;
        }
    };

    match registry.broadcast(&message).await {
        Ok(delivered) => debug!(
            connection_id,
            author = %message.author,
            delivered,
            "Broadcast chat message"
        ),
        Err(e) => error!(connection_id, "Failed to encode chat message: {}", e),
    }
}
