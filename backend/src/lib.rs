//! Movie Chat Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod movies;
pub mod relay;
/// Application state management
///
/// Holds the service handles injected into every handler.
pub mod state;
pub mod websocket;
