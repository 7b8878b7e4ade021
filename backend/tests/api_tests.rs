//! API integration tests for the session gateway, movie listing and client
//! serving.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mockito::{Mock, Server, ServerGuard};
use movie_chat_backend::{api, state::AppState};
use serde_json::{json, Value};
use serial_test::serial;
use std::sync::Arc;
use tower::ServiceExt;

mod common;
use common::{cookie_pair, seeded_store, test_config, test_state};

const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(Method::GET);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Log in through the router and return the cookie the browser would replay
async fn login(app: &Router, token: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/login")
                .method(Method::POST)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "access_token": token }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.starts_with("access_token="));
    assert!(set_cookie.contains("HttpOnly"));
    cookie_pair(&set_cookie)
}

/// Mock a provider whose userinfo endpoint accepts `token`, expecting `hits`
/// lookups
async fn mock_provider(server: &mut ServerGuard, token: &str, hits: usize) -> (Mock, Mock) {
    let discovery_body = json!({
        "authorization_endpoint": format!("{}/authorize", server.url()),
        "userinfo_endpoint": format!("{}/userinfo", server.url()),
    })
    .to_string();
    let discovery = server
        .mock("GET", DISCOVERY_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(discovery_body)
        .expect(hits)
        .create_async()
        .await;
    let userinfo = server
        .mock("GET", "/userinfo")
        .match_header("authorization", format!("Bearer {}", token).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name":"Alice","email":"alice@example.com"}"#)
        .expect(hits)
        .create_async()
        .await;
    (discovery, userinfo)
}

#[tokio::test]
#[serial]
async fn test_login_without_session_is_anonymous() {
    let mut server = Server::new_async().await;
    // The provider must not be contacted without a session
    let discovery = server
        .mock("GET", DISCOVERY_PATH)
        .expect(0)
        .create_async()
        .await;

    let discovery_url = format!("{}{}", server.url(), DISCOVERY_PATH);
    let app = api::router(test_state(&discovery_url, "client/dist").await);

    let response = app.oneshot(get("/api/login", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json.get("userinfo").is_none());
    assert_eq!(json["auth_config"]["discovery_url"], discovery_url);
    assert_eq!(json["auth_config"]["client_id"], "test-client");
    assert_eq!(json["auth_config"]["scope"], "email profile");
    assert!(json["auth_config"].get("client_secret").is_none());

    discovery.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_login_resolves_identity_with_bearer_token() {
    let mut server = Server::new_async().await;
    let (discovery, userinfo) = mock_provider(&mut server, "abc", 1).await;

    let discovery_url = format!("{}{}", server.url(), DISCOVERY_PATH);
    let app = api::router(test_state(&discovery_url, "client/dist").await);

    let cookie = login(&app, "abc").await;
    let response = app
        .clone()
        .oneshot(get("/api/login", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["userinfo"]["name"], "Alice");
    assert_eq!(json["userinfo"]["email"], "alice@example.com");
    assert_eq!(json["auth_config"]["client_id"], "test-client");

    discovery.assert_async().await;
    userinfo.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_login_swallows_provider_failure() {
    let mut server = Server::new_async().await;
    let discovery_body = json!({
        "userinfo_endpoint": format!("{}/userinfo", server.url()),
    })
    .to_string();
    let _discovery = server
        .mock("GET", DISCOVERY_PATH)
        .with_status(200)
        .with_body(discovery_body)
        .create_async()
        .await;
    let _userinfo = server
        .mock("GET", "/userinfo")
        .with_status(401)
        .create_async()
        .await;

    let discovery_url = format!("{}{}", server.url(), DISCOVERY_PATH);
    let app = api::router(test_state(&discovery_url, "client/dist").await);

    let cookie = login(&app, "revoked").await;
    let response = app
        .clone()
        .oneshot(get("/api/login", Some(&cookie)))
        .await
        .unwrap();

    // Same shape as "not logged in"
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json.get("userinfo").is_none());
    assert_eq!(json["auth_config"]["discovery_url"], discovery_url);
}

#[tokio::test]
#[serial]
async fn test_login_config_is_stable_across_requests() {
    let mut server = Server::new_async().await;
    let (discovery, userinfo) = mock_provider(&mut server, "abc", 3).await;

    let discovery_url = format!("{}{}", server.url(), DISCOVERY_PATH);
    let app = api::router(test_state(&discovery_url, "client/dist").await);
    let cookie = login(&app, "abc").await;

    let mut configs = Vec::new();
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(get("/api/login", Some(&cookie)))
            .await
            .unwrap();
        configs.push(body_json(response).await["auth_config"].clone());
    }
    assert!(configs.windows(2).all(|pair| pair[0] == pair[1]));

    discovery.assert_async().await;
    userinfo.assert_async().await;
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let app = api::router(test_state("http://127.0.0.1:9/discovery", "client/dist").await);

    for body in ["not json", r#"{"token":"abc"}"#] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/login")
                    .method(Method::POST)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let json = body_json(response).await;
        assert_eq!(json["status"], 400);
    }
}

#[tokio::test]
#[serial]
async fn test_logout_clears_session() {
    let mut server = Server::new_async().await;
    let discovery = server
        .mock("GET", DISCOVERY_PATH)
        .expect(0)
        .create_async()
        .await;

    let discovery_url = format!("{}{}", server.url(), DISCOVERY_PATH);
    let app = api::router(test_state(&discovery_url, "client/dist").await);
    let cookie = login(&app, "abc").await;

    let response = app
        .clone()
        .oneshot(get("/api/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.starts_with("access_token="));
    assert!(set_cookie.contains("Max-Age=0"));

    // The browser drops the expired cookie
    let response = app.oneshot(get("/api/login", None)).await.unwrap();
    let json = body_json(response).await;
    assert!(json.get("userinfo").is_none());
    assert!(json["auth_config"].is_object());

    discovery.assert_async().await;
}

#[tokio::test]
async fn test_movies_requires_session() {
    let app = api::router(test_state("http://127.0.0.1:9/discovery", "client/dist").await);

    for uri in ["/api/movies", "/api/movies/new"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_movies_rejects_forged_cookie() {
    let app = api::router(test_state("http://127.0.0.1:9/discovery", "client/dist").await);

    let response = app
        .oneshot(get("/api/movies", Some("access_token=forged")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_movies_lists_projection_with_session() {
    let store = seeded_store(&[
        json!({ "title": "Blacksmith Scene", "year": 1893, "plot": "Three men hammer.", "runtime": 1 }),
        json!({ "title": "The Great Train Robbery", "year": 1903, "genre": "Western", "poster": "https://example.com/p.jpg" }),
    ])
    .await;
    let state = AppState::new(
        test_config("http://127.0.0.1:9/discovery", "client/dist"),
        Arc::new(store),
    );
    let app = api::router(state);

    // Presence alone gates access; the token is never checked upstream
    let cookie = login(&app, "any-token").await;
    let response = app
        .clone()
        .oneshot(get("/api/movies", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let movies = json.as_array().unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(
        movies[0],
        json!({ "title": "Blacksmith Scene", "year": 1893, "plot": "Three men hammer." })
    );
    assert_eq!(movies[1]["genre"], "Western");

    let response = app
        .oneshot(get("/api/movies/new", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Not ready yet");
}

#[tokio::test]
async fn test_movies_list_is_capped() {
    let documents: Vec<Value> = (0..405)
        .map(|i| json!({ "title": format!("Movie {}", i) }))
        .collect();
    let store = seeded_store(&documents).await;
    let state = AppState::new(
        test_config("http://127.0.0.1:9/discovery", "client/dist"),
        Arc::new(store),
    );
    let app = api::router(state);
    let cookie = login(&app, "abc").await;

    let response = app
        .oneshot(get("/api/movies", Some(&cookie)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 400);
}

#[tokio::test]
async fn test_client_app_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<div id=\"app\"></div>").unwrap();
    std::fs::write(dir.path().join("bundle.js"), "console.log('app')").unwrap();
    let static_dir = dir.path().to_string_lossy().to_string();

    let app = api::router(test_state("http://127.0.0.1:9/discovery", &static_dir).await);

    // Client-side routes get the entry document
    for uri in ["/", "/movies", "/login/callback"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);
        assert_eq!(body_text(response).await, "<div id=\"app\"></div>");
    }

    // Assets are served as-is
    let response = app.clone().oneshot(get("/bundle.js", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "console.log('app')");

    // Unknown API paths are not swallowed by the client
    let response = app.clone().oneshot(get("/api/unknown", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/movies")
                .method(Method::POST)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
