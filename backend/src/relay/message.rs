//! Chat message wire format
//!
//! Frames in both directions are UTF-8 JSON objects `{"author", "message"}`.
//! Decoding never panics: a frame that is not a valid chat message yields a
//! `DecodeError` and the caller decides what to do with it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author used for messages originating from the server
pub const SERVER_AUTHOR: &str = "server";

/// Errors produced when decoding an inbound frame
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Binary frame was not valid UTF-8
    #[error("Frame is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),

    /// Frame was not a JSON object with string `author` and `message` fields
    #[error("Malformed chat message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A single chat message relayed between clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the sender (as claimed by the client)
    pub author: String,
    /// Message body
    pub message: String,
}

impl ChatMessage {
    /// Create a message
    pub fn new(author: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            message: message.into(),
        }
    }

    /// Greeting sent once to every new connection
    pub fn greeting() -> Self {
        Self::new(SERVER_AUTHOR, "hi there")
    }

    /// Decode a text frame
    ///
    /// Fields other than `author` and `message` are discarded.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decode a binary frame carrying UTF-8 JSON
    pub fn decode_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(std::str::from_utf8(bytes)?)
    }

    /// Serialize for sending
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
