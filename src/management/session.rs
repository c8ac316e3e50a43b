use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{types::TokenInfo, utils::generate_session_id};

/// Session key under which the user's OAuth token is stored.
pub const TOKEN_KEY: &str = "spotify_token_info";

/// Per-session key/value storage.
///
/// Implementations decide where the data lives; the token lifecycle only
/// relies on `get`, `set` and `clear`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str, key: &str) -> Option<Value>;
    async fn set(&self, session_id: &str, key: &str, value: Value);
    async fn clear(&self, session_id: &str);
}

/// Idle timeout used by [`MemorySessionStore::new`].
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct StoredSession {
    values: HashMap<String, Value>,
    last_access: Instant,
}

/// In-process session storage. Everything is lost on restart.
///
/// Every read or write refreshes a session's last access time. Writes sweep
/// out sessions that have been idle for longer than the TTL, and reads treat
/// them as absent.
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, StoredSession>>,
    idle_ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn is_idle(&self, session: &StoredSession, now: Instant) -> bool {
        now.duration_since(session.last_access) > self.idle_ttl
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str, key: &str) -> Option<Value> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        let idle = self.is_idle(sessions.get(session_id)?, now);
        if idle {
            sessions.remove(session_id);
            return None;
        }
        let session = sessions.get_mut(session_id)?;
        session.last_access = now;
        session.values.get(key).cloned()
    }

    async fn set(&self, session_id: &str, key: &str, value: Value) {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, session| !self.is_idle(session, now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle sessions");
        }

        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| StoredSession {
                values: HashMap::new(),
                last_access: now,
            });
        session.last_access = now;
        session.values.insert(key.to_string(), value);
    }

    async fn clear(&self, session_id: &str) {
        self.sessions.lock().await.remove(session_id);
    }
}

/// One user's session: an id plus the store it lives in.
#[derive(Clone)]
pub struct Session {
    id: String,
    is_new: bool,
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(id: String, is_new: bool, store: Arc<dyn SessionStore>) -> Self {
        Self { id, is_new, store }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True when the id was minted for this request and the client does not
    /// have the cookie yet.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// The stored token, if any. An unreadable entry counts as absent.
    pub async fn token(&self) -> Option<TokenInfo> {
        let value = self.store.get(&self.id, TOKEN_KEY).await?;
        match serde_json::from_value(value) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session token");
                None
            }
        }
    }

    pub async fn set_token(&self, token: &TokenInfo) {
        match serde_json::to_value(token) {
            Ok(value) => self.store.set(&self.id, TOKEN_KEY, value).await,
            Err(e) => tracing::warn!(error = %e, "could not serialize session token"),
        }
    }

    pub async fn clear(&self) {
        self.store.clear(&self.id).await;
    }

    /// Moves the session to a freshly generated id.
    ///
    /// The old id's data is dropped and the returned session is new, so the
    /// client receives the id in a cookie. Used after sign-in so an id chosen
    /// by the client never carries a token.
    pub async fn rotate(&self) -> Session {
        self.clear().await;
        Session::new(generate_session_id(), true, self.store.clone())
    }
}
