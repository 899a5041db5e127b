//! In-memory registry of live sessions, keyed by a random UUID.
//!
//! Sessions are never persisted; dropping one from the registry discards
//! its texts and report. Every lookup refreshes a session's last-seen time,
//! and [`SessionRegistry::evict_idle`] drops the ones left alone too long.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use contract_review::Session;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug)]
struct Entry {
    session: Arc<Session>,
    last_seen: Instant,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Entry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, Arc<Session>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Session::new());
        let entry = Entry {
            session: Arc::clone(&session),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        (id, session)
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    /// An analysis still running on a removed session finishes against its
    /// own handle; the result is simply dropped with it.
    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drops sessions not looked up for at least `max_idle`. A session with
    /// an analysis in flight is kept. Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.session.is_analyzing() || now.duration_since(entry.last_seen) < max_idle
        });
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
