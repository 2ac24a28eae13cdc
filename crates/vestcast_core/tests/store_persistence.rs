use chrono::{Duration, Utc};
use rusqlite::Connection;
use vestcast_core::store::migrations::latest_version;
use vestcast_core::store::{KvStore, SnapshotStore, StateVault, StoreError};

const TEST_KEY: &str = "vestcast.state.v3";

#[test]
fn kv_store_round_trips_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let store = KvStore::open(dir.path().join("state.sqlite3")).unwrap();

    assert_eq!(store.load(TEST_KEY).unwrap(), None);

    store.save(TEST_KEY, r#"{"grants":[]}"#).unwrap();
    assert_eq!(
        store.load(TEST_KEY).unwrap().as_deref(),
        Some(r#"{"grants":[]}"#)
    );

    store.save(TEST_KEY, "updated").unwrap();
    assert_eq!(store.load(TEST_KEY).unwrap().as_deref(), Some("updated"));
}

#[test]
fn kv_store_keys_are_independent() {
    let store = KvStore::open_in_memory().unwrap();
    store.save("a", "payload-a").unwrap();
    store.save("b", "payload-b").unwrap();

    assert_eq!(store.load("a").unwrap().as_deref(), Some("payload-a"));
    assert_eq!(store.load("b").unwrap().as_deref(), Some("payload-b"));
    assert_eq!(store.load("c").unwrap(), None);
}

#[test]
fn reopening_the_same_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.sqlite3");

    let store = KvStore::open(&path).unwrap();
    store.save(TEST_KEY, "persisted").unwrap();
    assert_eq!(store.schema_version().unwrap(), latest_version());
    drop(store);

    let store = KvStore::open(&path).unwrap();
    assert_eq!(store.schema_version().unwrap(), latest_version());
    assert_eq!(store.load(TEST_KEY).unwrap().as_deref(), Some("persisted"));
}

#[test]
fn a_newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = KvStore::open(&path).unwrap_err();
    match err {
        StoreError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn snapshot_expires_after_its_ttl() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("snapshot.json"));
    let saved_at = Utc::now();

    store.save_at(TEST_KEY, "payload", saved_at).unwrap();

    let fresh = store.load_at(TEST_KEY, saved_at + Duration::days(1)).unwrap();
    assert_eq!(fresh.as_deref(), Some("payload"));

    let stale = store
        .load_at(TEST_KEY, saved_at + Duration::days(366))
        .unwrap();
    assert_eq!(stale, None);
}

#[test]
fn snapshot_misses_on_wrong_key_missing_file_or_junk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let store = SnapshotStore::new(path.clone());

    assert_eq!(store.load(TEST_KEY).unwrap(), None);

    store.save(TEST_KEY, "payload").unwrap();
    assert_eq!(store.load("some.other.key").unwrap(), None);

    std::fs::write(&path, "not a snapshot").unwrap();
    assert_eq!(store.load(TEST_KEY).unwrap(), None);
}

#[test]
fn vault_prefers_the_snapshot_and_falls_back_to_kv() {
    let dir = tempfile::tempdir().unwrap();
    let vault = StateVault::open(dir.path(), TEST_KEY).unwrap();

    assert_eq!(vault.load(), None);

    vault.persist("payload-both");
    assert_eq!(vault.load().as_deref(), Some("payload-both"));

    // With the snapshot gone, the durable kv copy answers.
    std::fs::remove_file(dir.path().join("vestcast_snapshot.json")).unwrap();
    assert_eq!(vault.load().as_deref(), Some("payload-both"));
}

#[test]
fn vault_survives_a_corrupted_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let vault = StateVault::open(dir.path(), TEST_KEY).unwrap();

    vault.persist("good-payload");
    std::fs::write(dir.path().join("vestcast_snapshot.json"), "garbage").unwrap();

    assert_eq!(vault.load().as_deref(), Some("good-payload"));
}
