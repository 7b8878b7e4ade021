//! API module
//!
//! Contains HTTP request handlers and assembles the application router.

pub mod login;
pub mod movies;
pub mod static_files;

use crate::state::AppState;
use crate::websocket;
use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Session gateway
        .route(
            "/api/login",
            get(login::get_login).post(login::post_login),
        )
        .route("/api/logout", get(login::logout))
        // Movie listing (session required)
        .nest("/api/movies", movies::router(state.clone()))
        // Chat relay
        .route("/ws", get(websocket::websocket_handler))
        .route("/", get(websocket::root_handler))
        // Client application for everything else
        .fallback(static_files::client_app)
        // Middleware (order matters - request_id should be first)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}
