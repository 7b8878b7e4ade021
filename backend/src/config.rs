//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. A `.env` file in the working directory is loaded
//! before the environment is read.

use std::env;

/// Default OpenID Connect discovery document
pub const DEFAULT_DISCOVERY_URL: &str =
    "https://accounts.google.com/.well-known/openid-configuration";

/// Default scope requested during the implicit grant
pub const DEFAULT_SCOPE: &str = "email profile";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Identity provider settings shared with the browser client
    pub auth: AuthConfig,
    /// Session cookie configuration
    pub session: SessionConfig,
    /// Movie store configuration
    pub store: StoreConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Directory holding the built client application
    pub static_dir: String,
}

/// Identity provider configuration
///
/// Serialized as-is into the `auth_config` field of `GET /api/login`, so it
/// must never carry a client secret.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AuthConfig {
    /// OpenID Connect discovery document URL
    pub discovery_url: String,
    /// OAuth client id registered with the provider
    pub client_id: String,
    /// Space separated scopes
    pub scope: String,
}

/// Session cookie configuration
#[derive(Clone)]
pub struct SessionConfig {
    /// Secret the cookie signing key is derived from (None = random per process)
    pub cookie_secret: Option<String>,
    /// Cookie lifetime in seconds
    pub ttl_secs: u64,
}

// Keep the secret out of logs
impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field(
                "cookie_secret",
                &self.cookie_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

/// Movie store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// sqlx connection string for the movie collection
    pub database_url: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "client/dist".to_string()),
            },
            auth: AuthConfig {
                discovery_url: env::var("DISCOVERY_URL")
                    .unwrap_or_else(|_| DEFAULT_DISCOVERY_URL.to_string()),
                client_id: env::var("CLIENT_ID").unwrap_or_default(),
                scope: env::var("AUTH_SCOPE").unwrap_or_else(|_| DEFAULT_SCOPE.to_string()),
            },
            session: SessionConfig {
                cookie_secret: env::var("COOKIE_SECRET").ok().filter(|s| !s.is_empty()),
                ttl_secs: env::var("SESSION_TTL_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(60 * 60 * 24),
            },
            store: StoreConfig {
                database_url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:data/movies.db".to_string()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
