//! Session gateway handlers
//!
//! `POST /api/login` stores the access token obtained by the browser in a
//! signed cookie, `GET /api/login` resolves that cookie to the user's
//! identity, and `GET /api/logout` clears it.

use crate::auth::{self, UserInfo};
use crate::config::AuthConfig;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// Request types
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub access_token: String,
}

// Response types
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userinfo: Option<UserInfo>,
    pub auth_config: AuthConfig,
}

// GET /api/login - Resolve the session to an identity
//
// Identity provider failures are logged and reported as "not logged in".
pub async fn get_login(State(state): State<AppState>, jar: SignedCookieJar) -> Json<LoginResponse> {
    let userinfo = match auth::access_token(&jar) {
        Some(token) => match state.identity.userinfo(&token).await {
            Ok(info) => Some(info),
            Err(e) => {
                error!(error = %e, "Failed to resolve session with identity provider");
                None
            }
        },
        None => None,
    };

    Json(LoginResponse {
        userinfo,
        auth_config: state.config.auth.clone(),
    })
}

// POST /api/login - Store the access token in a signed cookie
//
// The token is not validated; only the body shape is.
pub async fn post_login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(SignedCookieJar, StatusCode), AppError> {
    let Json(request) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    info!("Session started");
    let jar = auth::start_session(jar, request.access_token, state.config.session.ttl_secs);
    Ok((jar, StatusCode::OK))
}

// GET /api/logout - Clear the session cookie
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, StatusCode) {
    info!("Session ended");
    (auth::end_session(jar), StatusCode::OK)
}
