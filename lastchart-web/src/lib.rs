//! lastchart-web library - the separately-hosted client application
//!
//! Captures the credential from the handoff URL, persists it across
//! restarts, gates the catalog view on its presence, and fetches the
//! catalog from the server with the stored bearer token.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod session;

use catalog::CatalogClient;
use session::ClientSession;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Persistent client-side session (token + user)
    pub session: Arc<ClientSession>,
    /// Catalog fetch client with its view state machine
    pub catalog: Arc<CatalogClient>,
    /// Base URL of the lastchart-server origin
    pub server_url: String,
}

impl AppState {
    pub fn new(session: ClientSession, catalog: CatalogClient, server_url: String) -> Self {
        Self {
            session: Arc::new(session),
            catalog: Arc::new(catalog),
            server_url,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::ui::index))
        .route("/artists", get(api::ui::artists_view))
        .route("/login", get(api::ui::login_redirect))
        .route("/logout", post(api::ui::logout))
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
