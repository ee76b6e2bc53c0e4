//! Catalog fetch client and its view state machine

use lastchart_common::api::types::ArtistsResponse;
use lastchart_common::db::catalog::Artist;
use std::sync::RwLock;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Why a fetch failed
///
/// A missing or rejected credential is kept distinct from transport
/// trouble so the view can say the right thing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("Not authorized - please log in again")]
    Unauthorized,

    #[error("Failed to fetch artists: {0}")]
    Transport(String),
}

/// View state for the catalog listing
///
/// `Idle -> Pending -> Success | Failure`; re-invocation re-enters
/// `Pending`, so no stale error survives a refetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Pending,
    Success(Vec<Artist>),
    Failure(FetchFailure),
}

/// Authenticated catalog fetch client
pub struct CatalogClient {
    http_client: reqwest::Client,
    api_base: String,
    state: RwLock<FetchState>,
}

impl CatalogClient {
    pub fn new(api_base: String) -> Result<Self, FetchFailure> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base,
            state: RwLock::new(FetchState::Idle),
        })
    }

    /// Current view state
    pub fn state(&self) -> FetchState {
        self.state.read().unwrap().clone()
    }

    /// Issue one authenticated catalog request
    ///
    /// Passes through `Pending` first, then lands on `Success` or
    /// `Failure` and returns the final state. A missing token fails
    /// without a network round trip.
    pub async fn fetch_all(&self, token: Option<&str>) -> FetchState {
        *self.state.write().unwrap() = FetchState::Pending;

        let result = self.request_artists(token).await;
        let state = match result {
            Ok(artists) => {
                debug!(count = artists.len(), "Catalog fetch succeeded");
                FetchState::Success(artists)
            }
            Err(failure) => FetchState::Failure(failure),
        };

        *self.state.write().unwrap() = state.clone();
        state
    }

    async fn request_artists(&self, token: Option<&str>) -> Result<Vec<Artist>, FetchFailure> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(FetchFailure::Unauthorized),
        };

        let response = self
            .http_client
            .get(format!("{}/api/artists", self.api_base))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FetchFailure::Unauthorized);
        }
        if !status.is_success() {
            return Err(FetchFailure::Transport(format!("HTTP {}", status)));
        }

        let body: ArtistsResponse = response
            .json()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        Ok(body.data)
    }
}
