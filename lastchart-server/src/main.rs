//! lastchart-server - authentication and catalog API service
//!
//! Issues bearer tokens on login, hands sessions off to the web client,
//! and serves the imported artist catalog to authenticated callers.

use anyhow::Result;
use lastchart_common::config;
use lastchart_server::{build_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting LastChart server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let root_folder = config::resolve_root_folder(None, "LASTCHART_ROOT_FOLDER")?;
    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = lastchart_common::db::init_database(&db_path).await?;

    let client_origin = config::env_or("LASTCHART_CLIENT_ORIGIN", "http://127.0.0.1:5741");
    let state = AppState::new(pool, client_origin);

    // Make sure the development account exists on a fresh database
    state.auth.ensure_seed_user().await?;

    let app = build_router(state);

    let addr = config::env_or("LASTCHART_SERVER_ADDR", "127.0.0.1:5740");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("lastchart-server listening on http://{}", addr);
    info!("Login page: http://{}/login", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
