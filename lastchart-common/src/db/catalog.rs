//! Catalog store: the persistent, ordered collection of artist records
//!
//! The catalog is only ever rewritten wholesale by an import run. Display
//! ordering (listeners descending, insertion order on ties) is decided here,
//! not by the import pipeline.

use crate::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Stored artist record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artist {
    /// Opaque stable identifier assigned on insert
    pub id: i64,
    pub name: String,
    /// Non-negative popularity count
    pub listeners: i64,
    pub url: String,
    pub image: Option<String>,
}

/// Artist record as produced by the import pipeline, before the store
/// assigns an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtist {
    pub name: String,
    pub listeners: i64,
    pub url: String,
    pub image: Option<String>,
}

/// Full listing ordered by listeners descending, insertion order on ties
pub async fn all_by_listeners(pool: &SqlitePool) -> Result<Vec<Artist>> {
    let artists = sqlx::query_as::<_, Artist>(
        "SELECT id, name, listeners, url, image FROM artists
         ORDER BY listeners DESC, id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(artists)
}

/// Replace the entire catalog in one transaction (staged replace)
///
/// Delete and bulk insert commit together, so a concurrent reader either
/// sees the previous catalog or the new one, never an empty interim state.
/// Returns the number of inserted records.
pub async fn replace_all(pool: &SqlitePool, records: &[NewArtist]) -> Result<u64> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM artists").execute(&mut *tx).await?;

    let mut inserted = 0u64;
    for record in records {
        sqlx::query("INSERT INTO artists (name, listeners, url, image) VALUES (?, ?, ?, ?)")
            .bind(&record.name)
            .bind(record.listeners)
            .bind(&record.url)
            .bind(&record.image)
            .execute(&mut *tx)
            .await?;
        inserted += 1;
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Number of records currently in the catalog
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artists")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
