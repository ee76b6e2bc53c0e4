//! Integration tests for the web client
//!
//! Drives the capture/guard/fetch flow against a stub upstream server
//! standing in for lastchart-server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use lastchart_web::catalog::CatalogClient;
use lastchart_web::session::ClientSession;
use lastchart_web::{build_router, AppState};
use serde_json::json;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

/// Spawn a stub upstream on an ephemeral port; returns its base URL
async fn spawn_stub(artists_status: StatusCode, artists_body: serde_json::Value) -> String {
    let app = Router::new()
        .route(
            "/api/artists",
            get(move || {
                let body = artists_body.clone();
                async move { (artists_status, Json(body)) }
            }),
        )
        .route(
            "/api/logout",
            post(|| async { Json(json!({ "success": true })) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn setup_app(server_url: &str, state_dir: &TempDir) -> (Router, AppState) {
    let session = ClientSession::new(state_dir.path());
    let catalog = CatalogClient::new(server_url.to_string()).unwrap();
    let state = AppState::new(session, catalog, server_url.to_string());
    (build_router(state.clone()), state)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const USER_PARAM: &str = "%7B%22id%22%3A1%2C%22name%22%3A%22Jo%22%2C%22email%22%3A%22jo%40x.com%22%7D";

#[tokio::test]
async fn unauthenticated_artists_view_redirects_without_content() {
    let server_url = spawn_stub(StatusCode::OK, json!({"success": true, "data": []})).await;
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&server_url, &dir);

    let response = app.oneshot(get_request("/artists")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        format!("{}/login", server_url)
    );

    // Nothing protected leaks alongside the redirect
    let body = extract_text(response.into_body()).await;
    assert!(!body.contains("Top Artists"));
}

#[tokio::test]
async fn capture_persists_session_and_redirects_to_artists() {
    let server_url = spawn_stub(StatusCode::OK, json!({"success": true, "data": []})).await;
    let dir = TempDir::new().unwrap();
    let (app, state) = setup_app(&server_url, &dir);

    let uri = format!("/?token=abc123&user={}", USER_PARAM);
    let response = app.oneshot(get_request(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        "/artists"
    );
    assert!(state.session.is_authenticated());
    assert_eq!(state.session.token().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn empty_token_handoff_is_refused() {
    let server_url = spawn_stub(StatusCode::OK, json!({"success": true, "data": []})).await;
    let dir = TempDir::new().unwrap();
    let (app, state) = setup_app(&server_url, &dir);

    let uri = format!("/?token=&user={}", USER_PARAM);
    let response = app.oneshot(get_request(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        format!("{}/login", server_url)
    );
    assert!(!state.session.is_authenticated());
}

#[tokio::test]
async fn authenticated_view_renders_fetched_catalog() {
    let server_url = spawn_stub(
        StatusCode::OK,
        json!({
            "success": true,
            "data": [
                {"id": 2, "name": "B", "listeners": 5000, "url": "", "image": null},
                {"id": 3, "name": "C", "listeners": 3000, "url": "", "image": null},
                {"id": 1, "name": "A", "listeners": 1000, "url": "", "image": null}
            ]
        }),
    )
    .await;
    let dir = TempDir::new().unwrap();
    let (app, state) = setup_app(&server_url, &dir);
    state
        .session
        .capture("abc123", r#"{"id":1,"name":"Jo","email":"jo@x.com"}"#)
        .unwrap();

    let response = app.oneshot(get_request("/artists")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = extract_text(response.into_body()).await;
    assert!(page.contains("Signed in as Jo"));
    assert!(page.contains(">B<"));
    assert!(page.contains("5000"));
    // Server-provided order is kept as-is
    assert!(page.find(">B<").unwrap() < page.find(">C<").unwrap());
}

#[tokio::test]
async fn upstream_401_renders_unauthorized_message() {
    let server_url = spawn_stub(
        StatusCode::UNAUTHORIZED,
        json!({"error": "Unauthenticated"}),
    )
    .await;
    let dir = TempDir::new().unwrap();
    let (app, state) = setup_app(&server_url, &dir);
    state.session.capture("stale-token", "{}").unwrap();

    let response = app.oneshot(get_request("/artists")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = extract_text(response.into_body()).await;
    assert!(page.contains("Not authorized"));
}

#[tokio::test]
async fn empty_catalog_renders_empty_state() {
    let server_url = spawn_stub(StatusCode::OK, json!({"success": true, "data": []})).await;
    let dir = TempDir::new().unwrap();
    let (app, state) = setup_app(&server_url, &dir);
    state
        .session
        .capture("abc123", r#"{"id":1,"name":"Jo","email":"jo@x.com"}"#)
        .unwrap();

    let response = app.oneshot(get_request("/artists")).await.unwrap();
    let page = extract_text(response.into_body()).await;
    assert!(page.contains("No artists in the catalog"));
    assert!(!page.contains("Loading artists"));
}

#[tokio::test]
async fn logout_clears_session_and_redirects_to_login() {
    let server_url = spawn_stub(StatusCode::OK, json!({"success": true, "data": []})).await;
    let dir = TempDir::new().unwrap();
    let (app, state) = setup_app(&server_url, &dir);
    state.session.capture("abc123", "{}").unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        format!("{}/login", server_url)
    );
    assert!(!state.session.is_authenticated());

    // The guard now bounces the protected view again
    let response = app.oneshot(get_request("/artists")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
