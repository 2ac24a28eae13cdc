//! Durable SQLite key-value store for state payloads.
//!
//! # Responsibility
//! - Open and bootstrap the backing SQLite database.
//! - Provide load/save over the `planner_state` table.
//!
//! # Invariants
//! - Returned connections have all migrations applied.
//! - A save replaces the previous payload for the same key atomically.

use crate::store::migrations::apply_migrations;
use crate::store::StoreResult;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// SQLite-backed payload store.
#[derive(Debug)]
pub struct KvStore {
    conn: Connection,
}

impl KvStore {
    /// Opens the database file and applies pending migrations.
    ///
    /// # Side effects
    /// - Emits `kv_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        info!("event=kv_open module=store status=start mode=file");

        match Connection::open(path).map_err(Into::into).and_then(|mut conn| {
            bootstrap_connection(&mut conn)?;
            Ok(conn)
        }) {
            Ok(conn) => {
                info!(
                    "event=kv_open module=store status=ok mode=file duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self { conn })
            }
            Err(err) => {
                error!(
                    "event=kv_open module=store status=error mode=file duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Opens an in-memory database, mainly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let mut conn = Connection::open_in_memory()?;
        bootstrap_connection(&mut conn)?;
        Ok(Self { conn })
    }

    /// Returns the payload stored under `key`, if any.
    pub fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM planner_state WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    /// Inserts or replaces the payload stored under `key`.
    pub fn save(&self, key: &str, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO planner_state (key, payload)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }

    /// Current `PRAGMA user_version` of the backing database.
    pub fn schema_version(&self) -> StoreResult<u32> {
        let version = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        Ok(version)
    }
}

fn bootstrap_connection(conn: &mut Connection) -> StoreResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
