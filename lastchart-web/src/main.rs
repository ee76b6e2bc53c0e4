//! lastchart-web - client application hosting the catalog view
//!
//! Separately-hosted origin that receives the authentication handoff,
//! keeps the credential across restarts, and renders the artist catalog
//! fetched from the server.

use anyhow::Result;
use lastchart_common::config;
use lastchart_web::catalog::CatalogClient;
use lastchart_web::session::ClientSession;
use lastchart_web::{build_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting LastChart web client v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = config::resolve_root_folder(None, "LASTCHART_ROOT_FOLDER")?;
    let state_dir = root_folder.join("web");
    std::fs::create_dir_all(&state_dir)?;

    let server_url = config::env_or("LASTCHART_SERVER_URL", "http://127.0.0.1:5740");

    let session = ClientSession::new(&state_dir);
    let catalog = CatalogClient::new(server_url.clone())
        .map_err(|e| anyhow::anyhow!("HTTP client setup failed: {}", e))?;

    let state = AppState::new(session, catalog, server_url);
    let app = build_router(state);

    let addr = config::env_or("LASTCHART_WEB_ADDR", "127.0.0.1:5741");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("lastchart-web listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
