//! Signed session cookie
//!
//! The session is the provider's access token itself, stored client-side in
//! a signed cookie. The server keeps no session store; a cookie whose
//! signature does not verify is indistinguishable from no cookie at all.

use crate::error::AppError;
use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha256};

/// Name of the cookie holding the access token
pub const SESSION_COOKIE: &str = "access_token";

/// Derive the cookie signing key from the configured secret
///
/// Any secret length is accepted: it is hashed to 32 bytes before key
/// derivation. Without a secret a random key is generated, which invalidates
/// every session on restart.
pub fn signing_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => {
            let master = Sha256::digest(secret.as_bytes());
            Key::derive_from(&master)
        }
        None => {
            tracing::warn!("COOKIE_SECRET not set, using a random signing key");
            Key::generate()
        }
    }
}

/// Read the access token from a verified session cookie
pub fn access_token(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Store the access token in a signed session cookie
pub fn start_session(jar: SignedCookieJar, access_token: String, ttl_secs: u64) -> SignedCookieJar {
    let max_age = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
    let cookie = Cookie::build((SESSION_COOKIE, access_token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age));
    jar.add(cookie)
}

/// Clear the session cookie
pub fn end_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Middleware rejecting requests without a session cookie
///
/// Only presence is checked; the token is not validated against the
/// identity provider.
pub async fn require_session(
    jar: SignedCookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if access_token(&jar).is_none() {
        tracing::debug!(uri = %request.uri(), "Rejecting request without session");
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}
