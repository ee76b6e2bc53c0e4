//! Last.fm chart API client
//!
//! Read-only source of ranked artist records. Every field in the response
//! is treated as optional; normalization happens in the pipeline.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const LASTFM_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";
const USER_AGENT: &str = "LastChart/0.1.0 (https://github.com/lastchart/lastchart)";

/// Last.fm client errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// One ranked artist as returned by `chart.gettopartists`
///
/// `listeners` arrives as a decimal string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopArtist {
    pub name: Option<String>,
    pub listeners: Option<String>,
    pub url: Option<String>,
    /// Size-ordered list, smallest first
    #[serde(default)]
    pub image: Vec<ImageEntry>,
}

/// Image URL entry in the source's size-ordered list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageEntry {
    #[serde(rename = "#text", default)]
    pub text: String,
    #[serde(default)]
    pub size: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    artists: Option<ChartArtists>,
}

#[derive(Debug, Deserialize)]
struct ChartArtists {
    #[serde(default)]
    artist: Vec<TopArtist>,
}

/// Source of ranked artist records
///
/// Seam for the pipeline: production uses [`LastFmClient`], tests stub it.
pub trait ArtistSource {
    fn fetch_top(
        &self,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<TopArtist>, SourceError>> + Send;
}

/// Last.fm API client
pub struct LastFmClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl LastFmClient {
    pub fn new(api_key: String) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: LASTFM_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (tests)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

impl ArtistSource for LastFmClient {
    /// Fetch up to `limit` top chart artists
    async fn fetch_top(&self, limit: u32) -> Result<Vec<TopArtist>, SourceError> {
        debug!(limit, "Querying Last.fm chart API");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("method", "chart.gettopartists"),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError(status.as_u16(), error_text));
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| SourceError::ParseError(e.to_string()))?;

        Ok(chart.artists.map(|a| a.artist).unwrap_or_default())
    }
}
