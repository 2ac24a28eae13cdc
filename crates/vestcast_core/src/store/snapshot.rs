//! Short-lived snapshot store for state payloads.
//!
//! # Responsibility
//! - Keep the most recent payload in a single JSON file with an expiry.
//! - Treat stale, mismatched or malformed snapshots as absent.
//!
//! # Invariants
//! - A snapshot older than its expiry never loads.
//! - A snapshot written for a different state key never loads.
//! - Malformed snapshot files are a miss, not an error.

use crate::store::StoreResult;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Snapshots expire roughly one year after the save that wrote them.
pub const SNAPSHOT_TTL_DAYS: i64 = 365;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotEnvelope {
    key: String,
    expires_at_epoch_ms: i64,
    payload: String,
}

/// File-backed snapshot store.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the payload stored under `key`, if present and not expired.
    pub fn load(&self, key: &str) -> StoreResult<Option<String>> {
        self.load_at(key, Utc::now())
    }

    /// [`SnapshotStore::load`] with an explicit clock, for expiry tests.
    pub fn load_at(&self, key: &str, now: DateTime<Utc>) -> StoreResult<Option<String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let Ok(envelope) = serde_json::from_str::<SnapshotEnvelope>(&text) else {
            return Ok(None);
        };
        if envelope.key != key || envelope.expires_at_epoch_ms <= now.timestamp_millis() {
            return Ok(None);
        }

        Ok(Some(envelope.payload))
    }

    /// Writes the payload under `key` with a fresh expiry.
    pub fn save(&self, key: &str, payload: &str) -> StoreResult<()> {
        self.save_at(key, payload, Utc::now())
    }

    /// [`SnapshotStore::save`] with an explicit clock, for expiry tests.
    pub fn save_at(&self, key: &str, payload: &str, now: DateTime<Utc>) -> StoreResult<()> {
        let envelope = SnapshotEnvelope {
            key: key.to_string(),
            expires_at_epoch_ms: (now + Duration::days(SNAPSHOT_TTL_DAYS)).timestamp_millis(),
            payload: payload.to_string(),
        };
        let text = serde_json::to_string(&envelope).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}
