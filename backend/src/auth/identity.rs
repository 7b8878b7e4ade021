//! Identity provider client
//!
//! Resolves an access token to the user's identity by reading the provider's
//! OpenID Connect discovery document and calling its userinfo endpoint.
//! Nothing is cached: every lookup performs both requests.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while talking to the identity provider
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Request could not be sent or the body could not be read
    #[error("Failed to reach identity provider: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-2xx status
    #[error("Error fetching {url}: {status}")]
    Status {
        /// URL that was requested
        url: String,
        /// HTTP status code returned
        status: u16,
    },

    /// Response body was not the expected JSON document
    #[error("Invalid response from {url}: {source}")]
    InvalidBody {
        /// URL that was requested
        url: String,
        /// Decode failure
        source: serde_json::Error,
    },
}

/// Subset of the discovery document this service reads
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryDocument {
    /// Endpoint returning claims about the bearer of an access token
    pub userinfo_endpoint: String,
    /// Endpoint the browser is redirected to for the implicit grant
    #[serde(default)]
    pub authorization_endpoint: Option<String>,
}

/// Identity returned by the userinfo endpoint
///
/// Only `name` is interpreted; every other claim is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining provider-supplied claims
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

/// Client for a single OpenID Connect provider
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    client: reqwest::Client,
    discovery_url: String,
}

impl IdentityProvider {
    /// Create a provider client using a shared HTTP client
    pub fn new(client: reqwest::Client, discovery_url: impl Into<String>) -> Self {
        Self {
            client,
            discovery_url: discovery_url.into(),
        }
    }

    /// Discovery document URL this client reads
    pub fn discovery_url(&self) -> &str {
        &self.discovery_url
    }

    /// Fetch and decode the discovery document
    pub async fn discover(&self) -> Result<DiscoveryDocument, IdentityError> {
        self.fetch_json(&self.discovery_url, None).await
    }

    /// Resolve an access token to the user's identity
    ///
    /// # Errors
    /// Any transport failure, non-2xx status or undecodable body from either
    /// the discovery document or the userinfo endpoint.
    pub async fn userinfo(&self, access_token: &str) -> Result<UserInfo, IdentityError> {
        let discovery = self.discover().await?;
        self.fetch_json(&discovery.userinfo_endpoint, Some(access_token))
            .await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<T, IdentityError> {
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        tracing::debug!(url = %url, authenticated = bearer.is_some(), "Calling identity provider");

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| IdentityError::InvalidBody {
            url: url.to_string(),
            source,
        })
    }
}
