//! Best-effort persistence for the encoded state payload.
//!
//! # Responsibility
//! - Define store-layer errors shared by both backends.
//! - Combine the short-lived snapshot and the durable key-value store
//!   into one read-priority/write-both vault.
//!
//! # Invariants
//! - Reads happen at startup only, snapshot first, key-value second.
//! - Writes are fire-and-forget: every failure is caught and logged,
//!   never propagated. In-memory state stays authoritative.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub mod kv;
pub mod migrations;
pub mod snapshot;

pub use kv::KvStore;
pub use snapshot::SnapshotStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer error for both persistence backends.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

const SNAPSHOT_FILE_NAME: &str = "vestcast_snapshot.json";
const KV_DB_FILE_NAME: &str = "vestcast.sqlite3";

/// Two redundant stores for the encoded payload.
///
/// The snapshot is the primary read source; the key-value store is the
/// durable backup consulted on a snapshot miss.
pub struct StateVault {
    key: String,
    snapshot: SnapshotStore,
    kv: KvStore,
}

impl StateVault {
    /// Opens both stores inside `dir`, applying key-value schema
    /// migrations.
    pub fn open(dir: &Path, key: impl Into<String>) -> StoreResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            key: key.into(),
            snapshot: SnapshotStore::new(dir.join(SNAPSHOT_FILE_NAME)),
            kv: KvStore::open(dir.join(KV_DB_FILE_NAME))?,
        })
    }

    /// Loads the payload, trying the snapshot first and the key-value
    /// store on a miss. Backend failures count as misses.
    pub fn load(&self) -> Option<String> {
        match self.snapshot.load(&self.key) {
            Ok(Some(payload)) => {
                info!("event=state_load module=store status=ok source=snapshot");
                return Some(payload);
            }
            Ok(None) => {}
            Err(err) => {
                warn!("event=state_load module=store status=error source=snapshot error={err}");
            }
        }

        match self.kv.load(&self.key) {
            Ok(Some(payload)) => {
                info!("event=state_load module=store status=ok source=kv");
                Some(payload)
            }
            Ok(None) => {
                info!("event=state_load module=store status=miss");
                None
            }
            Err(err) => {
                warn!("event=state_load module=store status=error source=kv error={err}");
                None
            }
        }
    }

    /// Writes the payload to both stores, best effort.
    ///
    /// Failures are logged and absorbed; persistence never blocks a
    /// mutation.
    pub fn persist(&self, payload: &str) {
        if let Err(err) = self.snapshot.save(&self.key, payload) {
            warn!("event=state_persist module=store status=error target=snapshot error={err}");
        }
        if let Err(err) = self.kv.save(&self.key, payload) {
            warn!("event=state_persist module=store status=error target=kv error={err}");
        }
    }
}
