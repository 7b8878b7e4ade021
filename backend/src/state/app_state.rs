// Application state
// Service handles shared by every request and socket

use crate::auth::{signing_key, IdentityProvider};
use crate::config::Config;
use crate::movies::MovieStore;
use crate::relay::ConnectionRegistry;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

/// Main application state
///
/// Constructed once in `main` (or per test) and cloned into handlers. Every
/// field is a cheap handle; nothing here is a process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Identity provider client
    pub identity: IdentityProvider,
    /// Movie collection
    pub movies: Arc<dyn MovieStore>,
    /// Open relay connections
    pub relay: Arc<ConnectionRegistry>,
    /// Session cookie signing key
    cookie_key: Key,
}

impl AppState {
    /// Create application state with a fresh HTTP client and relay
    pub fn new(config: Config, movies: Arc<dyn MovieStore>) -> Self {
        Self::with_http_client(config, movies, reqwest::Client::new())
    }

    /// Create application state reusing an existing HTTP client
    pub fn with_http_client(
        config: Config,
        movies: Arc<dyn MovieStore>,
        client: reqwest::Client,
    ) -> Self {
        let cookie_key = signing_key(config.session.cookie_secret.as_deref());
        let identity = IdentityProvider::new(client, config.auth.discovery_url.clone());
        Self {
            config: Arc::new(config),
            identity,
            movies,
            relay: Arc::new(ConnectionRegistry::new()),
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
