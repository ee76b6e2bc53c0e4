//! Payload types exchanged between the server and the web client

use crate::db::catalog::Artist;
use serde::{Deserialize, Serialize};

/// User identity as carried in the handoff URL and API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Envelope for the catalog listing: `{"success": true, "data": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistsResponse {
    pub success: bool,
    pub data: Vec<Artist>,
}

/// Error envelope used by protected endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
