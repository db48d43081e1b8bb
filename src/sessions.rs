//! Session store: in-memory per-session state with idle pruning.
//!
//! Each composer or presentation session owns its state exclusively; nothing
//! is shared between sessions and nothing survives a restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SessionError;

struct Entry<S> {
    state: S,
    last_seen: DateTime<Utc>,
}

/// Sessions keyed by a random UUID.
pub struct SessionStore<S> {
    kind: &'static str,
    sessions: RwLock<HashMap<Uuid, Entry<S>>>,
    idle_timeout: Duration,
}

impl<S: Clone + Send + Sync + 'static> SessionStore<S> {
    /// Create a store. `kind` labels log lines ("composer", "presentation").
    pub fn new(kind: &'static str, idle_timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            kind,
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        })
    }

    /// Insert a new session and return its ID.
    pub async fn insert(&self, state: S) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(
            id,
            Entry {
                state,
                last_seen: Utc::now(),
            },
        );
        debug!(kind = self.kind, session_id = %id, "Session opened");
        id
    }

    /// Run `f` against a session's state under the write lock.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut S) -> R) -> Result<R, SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(SessionError::NotFound { id })?;
        entry.last_seen = Utc::now();
        Ok(f(&mut entry.state))
    }

    /// Drop sessions idle for longer than the timeout. Returns how many were
    /// removed.
    pub async fn prune_idle(&self) -> usize {
        self.prune_idle_at(Utc::now()).await
    }

    async fn prune_idle_at(&self, now: DateTime<Utc>) -> usize {
        let idle = chrono::Duration::from_std(self.idle_timeout)
            .unwrap_or_else(|_| chrono::Duration::days(36_500));
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.signed_duration_since(entry.last_seen) <= idle);
        let removed = before - sessions.len();
        if removed > 0 {
            info!(kind = self.kind, count = removed, "Pruned idle sessions");
        }
        removed
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Parse a session ID from a path segment.
pub fn parse_session_id(raw: &str) -> Result<Uuid, SessionError> {
    Uuid::parse_str(raw).map_err(|_| SessionError::InvalidId(raw.to_string()))
}

/// Spawn a background task that prunes idle sessions on an interval.
pub fn spawn_prune_task<S: Clone + Send + Sync + 'static>(
    store: Arc<SessionStore<S>>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            store.prune_idle().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read<S: Clone + Send + Sync + 'static>(
        store: &SessionStore<S>,
        id: Uuid,
    ) -> Result<S, SessionError> {
        store.update(id, |state| state.clone()).await
    }

    #[tokio::test]
    async fn insert_and_update() {
        let store = SessionStore::<u32>::new("test", Duration::from_secs(60));
        assert_eq!(store.len().await, 0);

        let id = store.insert(1).await;
        assert_eq!(read(&store, id).await, Ok(1));

        let doubled = store.update(id, |n| {
            *n *= 2;
            *n
        });
        assert_eq!(doubled.await, Ok(2));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = SessionStore::<u32>::new("test", Duration::from_secs(60));
        let id = Uuid::new_v4();
        assert_eq!(read(&store, id).await, Err(SessionError::NotFound { id }));
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::<Vec<u8>>::new("test", Duration::from_secs(60));
        let a = store.insert(vec![]).await;
        let b = store.insert(vec![]).await;
        store.update(a, |v| v.push(1)).await.unwrap();
        assert_eq!(read(&store, a).await.unwrap(), vec![1]);
        assert!(read(&store, b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn prune_drops_only_idle_sessions() {
        let store = SessionStore::<u32>::new("test", Duration::from_secs(60));
        let id = store.insert(7).await;

        assert_eq!(store.prune_idle_at(Utc::now()).await, 0);
        assert_eq!(read(&store, id).await, Ok(7));

        let later = Utc::now() + chrono::Duration::seconds(61);
        assert_eq!(store.prune_idle_at(later).await, 1);
        assert_eq!(store.len().await, 0);
    }

    #[test]
    fn session_id_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(parse_session_id(&id.to_string()), Ok(id));
        assert!(matches!(
            parse_session_id("nope"),
            Err(SessionError::InvalidId(_))
        ));
    }
}
