use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use spotlyrics::management::{MemorySessionStore, Session, SessionStore, TOKEN_KEY};
use spotlyrics::types::TokenInfo;

fn token(access: &str) -> TokenInfo {
    TokenInfo {
        access_token: access.to_string(),
        refresh_token: None,
        expires_at: 0,
        scope: "user-read-currently-playing".to_string(),
    }
}

#[tokio::test]
async fn test_set_get_and_clear() {
    let store = MemorySessionStore::new();

    store.set("s1", "k", json!("v")).await;
    assert_eq!(store.get("s1", "k").await, Some(json!("v")));
    assert_eq!(store.get("s1", "other").await, None);
    assert_eq!(store.get("s2", "k").await, None);

    store.clear("s1").await;
    assert_eq!(store.get("s1", "k").await, None);
    assert_eq!(store.session_count().await, 0);
}

#[tokio::test]
async fn test_idle_sessions_are_evicted_on_write() {
    let store = MemorySessionStore::with_idle_ttl(Duration::from_millis(50));

    for i in 0..1000 {
        store.set(&format!("visitor-{i}"), "k", json!(i)).await;
    }
    assert_eq!(store.session_count().await, 1000);

    tokio::time::sleep(Duration::from_millis(100)).await;
    store.set("latest", "k", json!("v")).await;

    assert_eq!(store.session_count().await, 1);
    assert_eq!(store.get("latest", "k").await, Some(json!("v")));
}

#[tokio::test]
async fn test_idle_session_reads_as_absent() {
    let store = MemorySessionStore::with_idle_ttl(Duration::from_millis(50));
    store.set("s1", "k", json!("v")).await;

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(store.get("s1", "k").await, None);
    assert_eq!(store.session_count().await, 0);
}

#[tokio::test]
async fn test_reads_keep_session_alive() {
    let store = MemorySessionStore::with_idle_ttl(Duration::from_millis(300));
    store.set("active", "k", json!("v")).await;
    store.set("idle", "k", json!("v")).await;

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(store.get("active", "k").await, Some(json!("v")));
    }
    store.set("other", "k", json!("v")).await;

    assert_eq!(store.get("idle", "k").await, None);
    assert_eq!(store.get("active", "k").await, Some(json!("v")));
}

#[tokio::test]
async fn test_rotate_moves_to_new_id() {
    let store = Arc::new(MemorySessionStore::new());
    let old = Session::new("chosen-by-client".to_string(), false, store.clone());
    old.set_token(&token("old-access")).await;

    let rotated = old.rotate().await;
    rotated.set_token(&token("new-access")).await;

    assert_ne!(rotated.id(), old.id());
    assert!(rotated.is_new());
    assert_eq!(old.token().await, None);
    assert_eq!(
        rotated.token().await.map(|t| t.access_token),
        Some("new-access".to_string())
    );
    assert_eq!(store.get("chosen-by-client", TOKEN_KEY).await, None);
    assert_eq!(store.session_count().await, 1);
}
