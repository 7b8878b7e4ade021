//! Client application serving
//!
//! Any GET outside `/api/` that no route claims is answered from the built
//! client: the file itself if it exists, otherwise the entry document so the
//! browser-side router can take over.

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

/// Entry document of the client application
pub const INDEX_FILE: &str = "index.html";

// Fallback handler for every unmatched request
pub async fn client_app(State(state): State<AppState>, request: Request) -> Response {
    if request.method() != Method::GET || request.uri().path().starts_with("/api/") {
        return StatusCode::NOT_FOUND.into_response();
    }
    serve_client(&state.config.server.static_dir, request).await
}

/// Serve a request from the client build directory
pub async fn serve_client(static_dir: &str, request: Request) -> Response {
    let index = Path::new(static_dir).join(INDEX_FILE);
    let service = ServeDir::new(static_dir).fallback(ServeFile::new(index));
    match service.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
