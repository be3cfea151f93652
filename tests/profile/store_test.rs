//! Round-trip and malformed-document tests across all store backends.

use sqlx::sqlite::SqlitePoolOptions;
use standin::profile::json_file::JsonFileStore;
use standin::profile::memory::MemoryProfileStore;
use standin::profile::sqlite::SqliteProfileStore;
use standin::profile::{ProfileStore, Speaker, UserProfile};

fn sample_profile() -> UserProfile {
    let mut profile = UserProfile::new("user_77");
    profile.display_name = "Sam".to_owned();
    profile.topics = vec!["travel".to_owned(), "food".to_owned()];
    profile.record_turn(Speaker::User, "hey!");
    profile.record_turn(Speaker::Bot, "heyy what's up?");
    profile
}

async fn sqlite_store() -> SqliteProfileStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");
    SqliteProfileStore::with_pool(pool)
        .await
        .expect("schema should create")
}

#[tokio::test]
async fn memory_store_roundtrips() {
    let store = MemoryProfileStore::new();
    let profile = sample_profile();
    store.put(&profile).await.expect("put should succeed");
    let loaded = store.get("user_77").await.expect("get should succeed");
    assert_eq!(loaded, Some(profile));
}

#[tokio::test]
async fn memory_store_returns_none_for_unknown_user() {
    let store = MemoryProfileStore::new();
    let loaded = store.get("nobody").await.expect("get should succeed");
    assert_eq!(loaded, None);
}

#[tokio::test]
async fn json_file_store_roundtrips() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let store = JsonFileStore::new(dir.path().join("profiles.json"));

    let profile = sample_profile();
    store.put(&profile).await.expect("put should succeed");
    let loaded = store.get("user_77").await.expect("get should succeed");
    assert_eq!(loaded, Some(profile));
}

#[tokio::test]
async fn json_file_store_holds_multiple_users() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let store = JsonFileStore::new(dir.path().join("profiles.json"));

    let first = sample_profile();
    let second = UserProfile::new("user_88");
    store.put(&first).await.expect("put should succeed");
    store.put(&second).await.expect("put should succeed");

    assert_eq!(
        store.get("user_77").await.expect("get should succeed"),
        Some(first)
    );
    assert_eq!(
        store.get("user_88").await.expect("get should succeed"),
        Some(second)
    );
}

#[tokio::test]
async fn json_file_store_recovers_from_garbage_file() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let path = dir.path().join("profiles.json");
    tokio::fs::write(&path, "{{{{ not json")
        .await
        .expect("write should succeed");

    let store = JsonFileStore::new(path);
    assert_eq!(store.get("user_77").await.expect("get should succeed"), None);

    // A put after recovery starts a fresh map.
    let profile = sample_profile();
    store.put(&profile).await.expect("put should succeed");
    assert_eq!(
        store.get("user_77").await.expect("get should succeed"),
        Some(profile)
    );
}

#[tokio::test]
async fn sqlite_store_roundtrips() {
    let store = sqlite_store().await;
    let profile = sample_profile();
    store.put(&profile).await.expect("put should succeed");
    let loaded = store.get("user_77").await.expect("get should succeed");
    assert_eq!(loaded, Some(profile));
}

#[tokio::test]
async fn sqlite_put_replaces_whole_document() {
    let store = sqlite_store().await;
    let mut profile = sample_profile();
    store.put(&profile).await.expect("put should succeed");

    profile.record_turn(Speaker::User, "another one");
    profile.relationship_level = "regular".to_owned();
    store.put(&profile).await.expect("second put should succeed");

    let loaded = store
        .get("user_77")
        .await
        .expect("get should succeed")
        .expect("profile should exist");
    assert_eq!(loaded, profile);
    assert_eq!(loaded.history.len(), 3);
}

#[tokio::test]
async fn sqlite_malformed_document_reads_as_absent() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");
    let store = SqliteProfileStore::with_pool(pool.clone())
        .await
        .expect("schema should create");

    sqlx::query("INSERT INTO profiles (user_id, document) VALUES ('broken', 'not json')")
        .execute(&pool)
        .await
        .expect("insert should succeed");

    assert_eq!(store.get("broken").await.expect("get should succeed"), None);
}
