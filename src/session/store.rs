//! In-memory conversation history keyed by session id

use crate::agent::ChatMessage;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// One conversation
#[derive(Debug, Default)]
struct Session {
    /// Held for the duration of a chat turn
    turn: Arc<Mutex<()>>,
    history: RwLock<Vec<ChatMessage>>,
    /// Creation timestamp (ms)
    created_at: i64,
}

impl Session {
    fn new() -> Self {
        Self {
            created_at: chrono::Utc::now().timestamp_millis(),
            ..Self::default()
        }
    }
}

/// Guard serializing chat turns on one session
pub type TurnGuard = OwnedMutexGuard<()>;

/// Session store
///
/// Sessions are created on first use. `lock` gives a key-scoped lock so
/// concurrent turns on the same id run one after another while other ids
/// proceed independently.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn session(&self, id: &str) -> Arc<Session> {
        if let Some(session) = self.sessions.read().await.get(id) {
            return session.clone();
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = id, "Created session");
                Arc::new(Session::new())
            })
            .clone()
    }

    /// Acquire the turn lock for `id`
    pub async fn lock(&self, id: &str) -> TurnGuard {
        self.session(id).await.turn.clone().lock_owned().await
    }

    /// Snapshot of the history of `id`; empty for unknown ids
    pub async fn get(&self, id: &str) -> Vec<ChatMessage> {
        match self.sessions.read().await.get(id) {
            Some(session) => session.history.read().await.clone(),
            None => Vec::new(),
        }
    }

    /// Append `messages` to the history of `id`
    pub async fn append(&self, id: &str, messages: impl IntoIterator<Item = ChatMessage>) {
        self.session(id).await.history.write().await.extend(messages);
    }

    /// Drop the oldest messages of `id` so at most `max` remain
    pub async fn trim(&self, id: &str, max: usize) {
        let Some(session) = self.sessions.read().await.get(id).cloned() else {
            return;
        };
        let mut history = session.history.write().await;
        if history.len() > max {
            let excess = history.len() - max;
            history.drain(..excess);
        }
    }

    /// Empty the history of `id`. Unknown ids are a no-op.
    pub async fn clear(&self, id: &str) {
        if let Some(session) = self.sessions.read().await.get(id) {
            session.history.write().await.clear();
            tracing::info!(session_id = id, "Cleared session history");
        }
    }

    /// Number of known sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Creation time (ms) of `id`, if it exists
    pub async fn created_at(&self, id: &str) -> Option<i64> {
        self.sessions.read().await.get(id).map(|s| s.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn turn(n: usize) -> [ChatMessage; 2] {
        [
            ChatMessage::user(format!("q{}", n)),
            ChatMessage::assistant(format!("a{}", n)),
        ]
    }

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let store = SessionStore::new();
        assert!(store.get("nope").await.is_empty());
        assert_eq!(store.session_count().await, 0);
        assert!(store.created_at("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_append_and_get() {
        let store = SessionStore::new();
        store.append("s", turn(1)).await;
        let history = store.get("s").await;
        assert_eq!(history, turn(1).to_vec());
        assert!(store.created_at("s").await.is_some());
    }

    #[tokio::test]
    async fn test_trim_keeps_most_recent() {
        let store = SessionStore::new();
        for n in 0..11 {
            store.append("s", turn(n)).await;
            store.trim("s", 20).await;
        }
        let history = store.get("s").await;
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].content, "q1");
        assert_eq!(history[19].content, "a10");
    }

    #[tokio::test]
    async fn test_trim_below_limit_is_noop() {
        let store = SessionStore::new();
        store.append("s", turn(0)).await;
        store.trim("s", 20).await;
        store.trim("missing", 20).await;
        assert_eq!(store.get("s").await.len(), 2);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_clear_only_affects_one_session() {
        let store = SessionStore::new();
        store.append("a", turn(0)).await;
        store.append("b", turn(0)).await;
        store.clear("a").await;
        store.clear("unknown").await;
        assert!(store.get("a").await.is_empty());
        assert_eq!(store.get("b").await.len(), 2);
    }

    #[tokio::test]
    async fn test_lock_serializes_same_session() {
        let store = SessionStore::new();
        let guard = store.lock("s").await;

        let other = store.clone();
        let waiter = tokio::spawn(async move {
            let _g = other.lock("s").await;
            other.append("s", turn(2)).await;
        });

        // A different session is not blocked
        let _free = store.lock("t").await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.get("s").await.is_empty());

        store.append("s", turn(1)).await;
        drop(guard);
        waiter.await.unwrap();

        let history = store.get("s").await;
        assert_eq!(history[0].content, "q1");
        assert_eq!(history[2].content, "q2");
    }
}
