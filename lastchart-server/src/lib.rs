//! lastchart-server library - authentication and catalog API service
//!
//! Owns the user/token registry, the login and handoff pages, and the
//! bearer-guarded catalog endpoint consumed by the web client.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod auth;
pub mod handoff;

use auth::AuthService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Token registry and credential checks
    pub auth: AuthService,
    /// Origin of the separately-hosted web client, target of the handoff
    pub client_origin: String,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, client_origin: String) -> Self {
        let auth = AuthService::new(db.clone());
        Self {
            db,
            auth,
            client_origin,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected API routes (require a valid bearer token)
    let protected = Router::new()
        .route("/api/artists", get(api::artists::list_artists))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::bearer_middleware,
        ));

    // Public routes
    let public = Router::new()
        .route("/login", get(api::ui::login_page).post(api::auth::login))
        .route("/home", get(api::ui::handoff_page))
        .route("/logout", post(api::auth::logout_form))
        .route("/api/logout", post(api::auth::logout_api))
        .merge(api::health::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
