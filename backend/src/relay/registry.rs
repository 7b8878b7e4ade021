//! Connection registry
//!
//! Tracks every open relay connection in registration order. Each connection
//! is represented by the sending half of an unbounded channel drained by that
//! socket's writer task, so fan-out never waits on a slow peer.

use super::message::ChatMessage;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// Identifier assigned to a connection at registration
pub type ConnectionId = u64;

/// Receiving half handed to a connection's writer task
pub type Outbound = mpsc::UnboundedReceiver<String>;

struct Connection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
}

/// Registry of open connections, owned by the relay
///
/// The lock is held for the whole of a broadcast, so two fan-outs never
/// interleave and every connection observes messages in dispatch order.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<Vec<Connection>>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection
    ///
    /// # Returns
    /// * `(ConnectionId, Outbound)` - id for later removal and the queue of
    ///   frames to write to the socket
    pub async fn register(&self) -> (ConnectionId, Outbound) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut connections = self.connections.lock().await;
        connections.push(Connection { id, tx });
        debug!(connection_id = id, open = connections.len(), "Connection registered");
        (id, rx)
    }

    /// Remove a connection
    ///
    /// Returns true if the connection was still registered.
    pub async fn remove(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        let before = connections.len();
        connections.retain(|connection| connection.id != id);
        let removed = connections.len() != before;
        if removed {
            debug!(connection_id = id, open = connections.len(), "Connection removed");
        }
        removed
    }

    /// Number of registered connections
    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// Whether no connection is registered
    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }

    /// Ids of registered connections, in registration order
    pub async fn ids(&self) -> Vec<ConnectionId> {
        self.connections
            .lock()
            .await
            .iter()
            .map(|connection| connection.id)
            .collect()
    }

    /// Queue a message for a single connection
    ///
    /// Returns false if the connection is unknown or its writer has gone away.
    pub async fn send_to(&self, id: ConnectionId, message: &ChatMessage) -> bool {
        let Ok(frame) = message.encode() else {
            return false;
        };
        let connections = self.connections.lock().await;
        connections
            .iter()
            .find(|connection| connection.id == id)
            .is_some_and(|connection| connection.tx.send(frame).is_ok())
    }

    /// Queue a message for every registered connection, sender included
    ///
    /// Connections whose writer has gone away are pruned.
    ///
    /// # Returns
    /// * `Ok(usize)` - number of connections the message was queued for
    pub async fn broadcast(&self, message: &ChatMessage) -> Result<usize, serde_json::Error> {
        let frame = message.encode()?;
        let mut connections = self.connections.lock().await;
        connections.retain(|connection| {
            let delivered = connection.tx.send(frame.clone()).is_ok();
            if !delivered {
                debug!(connection_id = connection.id, "Pruning closed connection");
            }
            delivered
        });
        Ok(connections.len())
    }
}
