//! Realtime relay
//!
//! Fan-out chat over WebSocket: every decoded inbound message is delivered to
//! all open connections, the sender included. The socket handling itself
//! lives in `crate::websocket`.

pub mod message;
pub mod registry;

pub use message::{ChatMessage, DecodeError};
pub use registry::{ConnectionId, ConnectionRegistry};
