//! Shared helpers for integration tests

#![allow(dead_code)]

use movie_chat_backend::config::{
    AuthConfig, Config, ServerConfig, SessionConfig, StoreConfig, DEFAULT_SCOPE,
};
use movie_chat_backend::movies::SqliteMovieStore;
use movie_chat_backend::state::AppState;
use std::sync::Arc;

/// Build a configuration pointing at the given discovery document
pub fn test_config(discovery_url: &str, static_dir: &str) -> Config {
    Config {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            static_dir: static_dir.to_string(),
        },
        auth: AuthConfig {
            discovery_url: discovery_url.to_string(),
            client_id: "test-client".to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        },
        session: SessionConfig {
            cookie_secret: Some("integration test secret".to_string()),
            ttl_secs: 3600,
        },
        store: StoreConfig {
            database_url: "sqlite::memory:".to_string(),
        },
    }
}

/// Open an in-memory store seeded with the given documents
pub async fn seeded_store(documents: &[serde_json::Value]) -> SqliteMovieStore {
    let store = SqliteMovieStore::connect("sqlite::memory:").await.unwrap();
    for document in documents {
        store.insert_document(document).await.unwrap();
    }
    store
}

/// Application state with an empty movie store
pub async fn test_state(discovery_url: &str, static_dir: &str) -> AppState {
    let store = seeded_store(&[]).await;
    AppState::new(test_config(discovery_url, static_dir), Arc::new(store))
}

/// Extract the `name=value` pair from a Set-Cookie header
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
