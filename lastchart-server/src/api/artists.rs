//! Authenticated catalog endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use lastchart_common::api::types::ArtistsResponse;
use lastchart_common::db::catalog;
use serde_json::json;
use tracing::error;

use crate::AppState;

/// GET /api/artists
///
/// Returns the full catalog ordered by listeners descending. The bearer
/// middleware has already vetted the caller.
pub async fn list_artists(State(state): State<AppState>) -> impl IntoResponse {
    match catalog::all_by_listeners(&state.db).await {
        Ok(artists) => Json(ArtistsResponse {
            success: true,
            data: artists,
        })
        .into_response(),
        Err(e) => {
            error!("Catalog query failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal error" })),
            )
                .into_response()
        }
    }
}
