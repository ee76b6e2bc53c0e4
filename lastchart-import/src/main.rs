//! lastchart-import - operator tool to refresh the artist catalog
//!
//! Pulls top chart artists from Last.fm and replaces the catalog in one
//! transaction. Exits non-zero if the source errored or returned nothing,
//! leaving the previous catalog untouched.

use anyhow::Result;
use clap::Parser;
use lastchart_common::config;
use lastchart_import::lastfm::LastFmClient;
use lastchart_import::pipeline;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "lastchart-import", about = "Import top artists from Last.fm")]
struct Args {
    /// Number of artists to import
    #[arg(long, default_value_t = 50)]
    limit: u32,

    /// Root folder holding the database (overrides LASTCHART_ROOT_FOLDER)
    #[arg(long)]
    root_folder: Option<String>,

    /// Last.fm API key
    #[arg(long, env = "LASTFM_API_KEY")]
    api_key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!(
        "Starting LastChart import v{} (limit {})",
        env!("CARGO_PKG_VERSION"),
        args.limit
    );

    let root_folder =
        config::resolve_root_folder(args.root_folder.as_deref(), "LASTCHART_ROOT_FOLDER")?;
    let db_path = config::database_path(&root_folder);
    let pool = lastchart_common::db::init_database(&db_path).await?;

    let client = LastFmClient::new(args.api_key)?;

    match pipeline::run(&client, &pool, args.limit).await {
        Ok(summary) => {
            info!(
                "Imported {} of {} fetched artists",
                summary.imported, summary.fetched
            );
            Ok(())
        }
        Err(e) => {
            error!("Import aborted: {}", e);
            eprintln!("Import aborted: {}", e);
            std::process::exit(1);
        }
    }
}
