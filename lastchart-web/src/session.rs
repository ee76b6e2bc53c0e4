//! Persistent client session
//!
//! Two string entries keyed `token` and `user`, stored as a JSON file under
//! the client's state directory so they outlast a restart. The in-memory
//! cache is the fast path; the file is the source of truth. Token and user
//! share one lifetime: captured together, cleared together.

use lastchart_common::api::types::UserInfo;
use lastchart_common::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

const SESSION_FILE: &str = "session.json";

/// On-disk session shape
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    /// User identity as the serialized JSON string it arrived as
    user: String,
}

/// User identity as the view layer sees it
///
/// A payload that fails to decode is carried as an opaque display name
/// rather than failing the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDisplay {
    Known(UserInfo),
    Opaque(String),
}

impl UserDisplay {
    pub fn display_name(&self) -> &str {
        match self {
            UserDisplay::Known(user) => &user.name,
            UserDisplay::Opaque(raw) => raw,
        }
    }
}

/// Client-side persistent credential store
pub struct ClientSession {
    path: PathBuf,
    cached: RwLock<Option<StoredSession>>,
}

impl ClientSession {
    /// Open the session store under `state_dir`, loading any persisted entry
    pub fn new(state_dir: &Path) -> Self {
        let path = state_dir.join(SESSION_FILE);
        let cached = RwLock::new(read_session_file(&path));
        Self { path, cached }
    }

    /// Persist the handoff credential; both entries are written together
    pub fn capture(&self, token: &str, raw_user: &str) -> Result<()> {
        let stored = StoredSession {
            token: token.to_string(),
            user: raw_user.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| lastchart_common::Error::Internal(e.to_string()))?;
        std::fs::write(&self.path, json)?;

        *self.cached.write().unwrap() = Some(stored);
        debug!("Captured session credential");
        Ok(())
    }

    /// Stored bearer token, if any
    pub fn token(&self) -> Option<String> {
        if let Some(stored) = self.cached.read().unwrap().as_ref() {
            return Some(stored.token.clone());
        }

        // Cache miss: the file decides
        let from_disk = read_session_file(&self.path);
        let token = from_disk.as_ref().map(|s| s.token.clone());
        *self.cached.write().unwrap() = from_disk;
        token
    }

    /// True iff a token is present in memory or in persistent storage
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }

    /// Decoded user identity; falls back to the raw string on malformed JSON
    pub fn user(&self) -> Option<UserDisplay> {
        self.token()?; // repopulates the cache from disk if needed

        let cached = self.cached.read().unwrap();
        let stored = cached.as_ref()?;
        match serde_json::from_str::<UserInfo>(&stored.user) {
            Ok(user) => Some(UserDisplay::Known(user)),
            Err(_) => {
                debug!("User payload is not valid JSON; treating as opaque name");
                Some(UserDisplay::Opaque(stored.user.clone()))
            }
        }
    }

    /// Remove both entries from memory and persistent storage
    pub fn clear(&self) -> Result<()> {
        *self.cached.write().unwrap() = None;
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        debug!("Cleared session");
        Ok(())
    }
}

fn read_session_file(path: &Path) -> Option<StoredSession> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(stored) => Some(stored),
        Err(e) => {
            warn!("Ignoring unreadable session file: {}", e);
            None
        }
    }
}
