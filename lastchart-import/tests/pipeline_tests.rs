//! Import pipeline integration tests
//!
//! Exercises the all-or-nothing refresh policy against an in-memory
//! catalog with a stubbed artist source.

use lastchart_common::db::catalog::{self, NewArtist};
use lastchart_common::db::init_in_memory;
use lastchart_import::lastfm::{ArtistSource, ImageEntry, SourceError, TopArtist};
use lastchart_import::pipeline::{self, ImportError};

/// Stub source yielding a fixed record set, an empty set, or an error
enum StubSource {
    Records(Vec<TopArtist>),
    Unavailable,
}

impl ArtistSource for StubSource {
    async fn fetch_top(&self, limit: u32) -> Result<Vec<TopArtist>, SourceError> {
        match self {
            StubSource::Records(records) => {
                Ok(records.iter().take(limit as usize).cloned().collect())
            }
            StubSource::Unavailable => {
                Err(SourceError::NetworkError("connection refused".to_string()))
            }
        }
    }
}

fn top_artist(name: &str, listeners: &str) -> TopArtist {
    TopArtist {
        name: Some(name.to_string()),
        listeners: Some(listeners.to_string()),
        url: Some(format!("https://www.last.fm/music/{}", name)),
        image: vec![
            ImageEntry {
                text: "small.jpg".to_string(),
                size: "small".to_string(),
            },
            ImageEntry {
                text: "large.jpg".to_string(),
                size: "large".to_string(),
            },
        ],
    }
}

async fn seed_prior_catalog(pool: &sqlx::SqlitePool) {
    catalog::replace_all(
        pool,
        &[NewArtist {
            name: "Prior".to_string(),
            listeners: 42,
            url: String::new(),
            image: None,
        }],
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn successful_run_imports_min_of_limit_and_available() {
    let pool = init_in_memory().await.unwrap();
    let source = StubSource::Records(vec![
        top_artist("A", "1000"),
        top_artist("B", "5000"),
        top_artist("C", "3000"),
    ]);

    // Limit above availability: all three land
    let summary = pipeline::run(&source, &pool, 50).await.unwrap();
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.imported, 3);

    // Limit below availability: exactly the limit lands
    let summary = pipeline::run(&source, &pool, 2).await.unwrap();
    assert_eq!(summary.imported, 2);
    assert_eq!(catalog::count(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn imported_records_are_normalized() {
    let pool = init_in_memory().await.unwrap();
    let source = StubSource::Records(vec![
        top_artist("Radiohead", "5000000"),
        TopArtist::default(), // everything absent
    ]);

    pipeline::run(&source, &pool, 50).await.unwrap();

    let listing = catalog::all_by_listeners(&pool).await.unwrap();
    assert_eq!(listing.len(), 2);

    let top = &listing[0];
    assert_eq!(top.name, "Radiohead");
    assert_eq!(top.listeners, 5_000_000);
    assert_eq!(top.image.as_deref(), Some("large.jpg"));

    let blank = &listing[1];
    assert_eq!(blank.name, "");
    assert_eq!(blank.listeners, 0);
    assert_eq!(blank.url, "");
    assert_eq!(blank.image, None);
}

#[tokio::test]
async fn empty_source_leaves_catalog_untouched() {
    let pool = init_in_memory().await.unwrap();
    seed_prior_catalog(&pool).await;

    let source = StubSource::Records(vec![]);
    let err = pipeline::run(&source, &pool, 50).await.unwrap_err();
    assert!(matches!(err, ImportError::EmptySource));

    let listing = catalog::all_by_listeners(&pool).await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "Prior");
}

#[tokio::test]
async fn unavailable_source_leaves_catalog_untouched() {
    let pool = init_in_memory().await.unwrap();
    seed_prior_catalog(&pool).await;

    let source = StubSource::Unavailable;
    let err = pipeline::run(&source, &pool, 50).await.unwrap_err();
    assert!(matches!(err, ImportError::SourceUnavailable(_)));

    let listing = catalog::all_by_listeners(&pool).await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "Prior");
}

#[tokio::test]
async fn rerun_replaces_previous_import_wholesale() {
    let pool = init_in_memory().await.unwrap();

    let first = StubSource::Records(vec![top_artist("Old", "10")]);
    pipeline::run(&first, &pool, 50).await.unwrap();

    let second = StubSource::Records(vec![top_artist("New", "20")]);
    pipeline::run(&second, &pool, 50).await.unwrap();

    let listing = catalog::all_by_listeners(&pool).await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "New");
}
