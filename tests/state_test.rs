use serde_json::Value;
use spotinline::management::{ContentCache, Namespace, TokenStore, TrackIndex};
use spotinline::types::{CachedFileReference, SpotifyAuth, Track};

fn create_reference(id: i64) -> CachedFileReference {
    CachedFileReference {
        id,
        access_hash: -id,
        file_reference: vec![0, 1, 2, 250, 255],
    }
}

#[tokio::test]
async fn test_missing_cache_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ContentCache::load(&dir.path().join("cache.json")).await.unwrap();

    assert!(cache.get(Namespace::Placeholder, "a").await.is_none());
    assert!(cache.get(Namespace::Final, "a").await.is_none());
    assert_eq!(cache.len(Namespace::Final).await, 0);
}

#[tokio::test]
async fn test_cache_namespaces_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ContentCache::load(&dir.path().join("cache.json")).await.unwrap();

    cache.put(Namespace::Placeholder, "a", create_reference(1)).await;

    assert_eq!(cache.get(Namespace::Placeholder, "a").await, Some(create_reference(1)));
    assert!(cache.get(Namespace::Final, "a").await.is_none());
}

#[tokio::test]
async fn test_cache_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let cache = ContentCache::load(&path).await.unwrap();
    cache.put(Namespace::Placeholder, "a", create_reference(1)).await;
    cache.put(Namespace::Final, "b", create_reference(2)).await;
    cache.persist().await.unwrap();

    let reloaded = ContentCache::load(&path).await.unwrap();
    assert_eq!(reloaded.get(Namespace::Placeholder, "a").await, Some(create_reference(1)));
    assert_eq!(reloaded.get(Namespace::Final, "b").await, Some(create_reference(2)));
}

#[tokio::test]
async fn test_cache_document_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let cache = ContentCache::load(&path).await.unwrap();
    cache.put(Namespace::Final, "b", create_reference(2)).await;
    cache.persist().await.unwrap();

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["inline_docs"], serde_json::json!({}));
    assert_eq!(json["sent_docs"]["b"]["id"], 2);
    assert_eq!(json["sent_docs"]["b"]["access_hash"], -2);
    // base64 of [0, 1, 2, 250, 255]
    assert_eq!(json["sent_docs"]["b"]["file_reference"], "AAEC+v8=");
}

#[tokio::test]
async fn test_corrupt_cache_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(ContentCache::load(&path).await.is_err());
}

#[tokio::test]
async fn test_token_store_starts_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::load(&dir.path().join("spotify.json")).await.unwrap();

    assert!(!store.is_authenticated().await);
    assert_eq!(store.snapshot().await, SpotifyAuth::default());
}

#[tokio::test]
async fn test_token_store_persists_every_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spotify.json");

    let store = TokenStore::load(&path).await.unwrap();
    store
        .set_tokens("access".to_string(), "refresh".to_string(), 100.0)
        .await
        .unwrap();
    store
        .update_access_token("access2".to_string(), None, 200.0)
        .await
        .unwrap();

    let reloaded = TokenStore::load(&path).await.unwrap();
    let auth = reloaded.snapshot().await;
    assert_eq!(auth.access_token.as_deref(), Some("access2"));
    assert_eq!(auth.refresh_token.as_deref(), Some("refresh"));
    assert_eq!(auth.refreshed_at, Some(200.0));
}

#[tokio::test]
async fn test_token_store_keeps_rotated_refresh_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::load(&dir.path().join("spotify.json")).await.unwrap();
    store
        .set_tokens("access".to_string(), "refresh".to_string(), 100.0)
        .await
        .unwrap();
    store
        .update_access_token("access2".to_string(), Some("refresh2".to_string()), 200.0)
        .await
        .unwrap();

    assert_eq!(store.snapshot().await.refresh_token.as_deref(), Some("refresh2"));
}

#[test]
fn test_track_index_overwrites_entries() {
    let index = TrackIndex::new();
    assert!(index.is_empty());

    index.remember_all(&[Track {
        id: "a".to_string(),
        name: "Old".to_string(),
        artist: "X".to_string(),
    }]);
    index.remember_all(&[Track {
        id: "a".to_string(),
        name: "New".to_string(),
        artist: "X".to_string(),
    }]);

    assert_eq!(index.len(), 1);
    assert_eq!(index.get("a").unwrap().name, "New");
    assert!(index.get("b").is_none());
}
