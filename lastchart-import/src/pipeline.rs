//! Import pipeline: fetch, normalize, staged replace
//!
//! All-or-nothing refresh: a failed or empty fetch aborts before the
//! catalog is touched, so a stale catalog survives a flaky source.

use lastchart_common::db::catalog::{self, NewArtist};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{error, info};

use crate::lastfm::{ArtistSource, TopArtist};

/// Import pipeline errors
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Source returned no artists")]
    EmptySource,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of a successful import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub fetched: usize,
    pub imported: u64,
}

/// Run one import: fetch up to `limit` records and replace the catalog
///
/// Insertion order follows the source's returned order; display ordering
/// is the catalog store's job. Concurrent runs serialize on the catalog
/// write transaction and never interleave.
pub async fn run<S: ArtistSource>(
    source: &S,
    db: &SqlitePool,
    limit: u32,
) -> Result<ImportSummary, ImportError> {
    info!(limit, "Fetching top artists");

    let fetched = source.fetch_top(limit).await.map_err(|e| {
        error!("Chart fetch failed: {}", e);
        ImportError::SourceUnavailable(e.to_string())
    })?;

    if fetched.is_empty() {
        return Err(ImportError::EmptySource);
    }

    let records: Vec<NewArtist> = fetched.iter().map(normalize).collect();

    let imported = catalog::replace_all(db, &records)
        .await
        .map_err(|e| match e {
            lastchart_common::Error::Database(db_err) => ImportError::Database(db_err),
            other => ImportError::SourceUnavailable(other.to_string()),
        })?;

    info!(fetched = fetched.len(), imported, "Import complete");

    Ok(ImportSummary {
        fetched: fetched.len(),
        imported,
    })
}

/// Normalize one source record into the catalog's canonical shape
///
/// Absent or non-numeric listener counts coerce to 0; name and url
/// default to empty strings.
pub fn normalize(artist: &TopArtist) -> NewArtist {
    NewArtist {
        name: artist.name.clone().unwrap_or_default(),
        listeners: artist
            .listeners
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|n| *n >= 0)
            .unwrap_or(0),
        url: artist.url.clone().unwrap_or_default(),
        image: pick_image(artist),
    }
}

/// Walk the size-ordered image list from largest to smallest and pick the
/// first entry with non-empty text (prefer the largest available)
fn pick_image(artist: &TopArtist) -> Option<String> {
    artist
        .image
        .iter()
        .rev()
        .find(|entry| !entry.text.is_empty())
        .map(|entry| entry.text.clone())
}
