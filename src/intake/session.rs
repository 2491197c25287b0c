//! Per-session intake state, keyed by session id.
//!
//! Every session owns its profile, rolling history and report flag behind its
//! own mutex. A turn holds that mutex from start to finish, so two turns for
//! the same session never interleave while different sessions run freely.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use super::history::ConversationHistory;
use super::profile::Profile;

/// State for one conversation.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub profile: Profile,
    pub history: ConversationHistory,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid, history_len: usize) -> Self {
        Self {
            id,
            profile: Profile::new(),
            history: ConversationHistory::new(history_len),
            last_active: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Forget everything collected so far.
    pub fn reset(&mut self) {
        self.profile.clear();
        self.history.clear();
        self.touch();
    }

    pub fn is_idle(&self, idle_for: chrono::Duration) -> bool {
        Utc::now() - self.last_active > idle_for
    }
}

/// In-memory registry of live sessions.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
    history_len: usize,
    idle_timeout: chrono::Duration,
}

impl SessionStore {
    pub fn new(history_len: usize, idle_timeout: std::time::Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history_len,
            idle_timeout: chrono::Duration::from_std(idle_timeout)
                .unwrap_or_else(|_| chrono::Duration::hours(2)),
        }
    }

    /// Look up a live session and mark it active.
    ///
    /// The touch happens under the map's read lock, so the expiry pass cannot
    /// drop the session between this lookup and the caller's `lock()`. A
    /// session already locked by a turn is skipped by the expiry pass anyway.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id)?;
        if let Ok(mut s) = session.try_lock() {
            s.touch();
        }
        Some(Arc::clone(session))
    }

    /// Return the session for `id`, or start a fresh one when `id` is absent
    /// or unknown. The fresh session gets a newly generated id.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, Arc<Mutex<Session>>) {
        if let Some(id) = id {
            if let Some(session) = self.get(id).await {
                return (id, session);
            }
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new(id, self.history_len)));
        self.sessions.write().await.insert(id, Arc::clone(&session));
        info!(session_id = %id, "Session started");
        (id, session)
    }

    /// Reset a session in place. Returns `false` if it does not exist.
    pub async fn reset(&self, id: Uuid) -> bool {
        match self.get(id).await {
            Some(session) => {
                session.lock().await.reset();
                info!(session_id = %id, "Session reset");
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than the configured timeout. Sessions
    /// currently in a turn are skipped. Returns how many were removed.
    pub async fn expire_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(s) => !s.is_idle(self.idle_timeout),
            Err(_) => true,
        });
        let removed = before - sessions.len();
        if removed > 0 {
            info!(removed, remaining = sessions.len(), "Pruned idle sessions");
        }
        removed
    }
}

/// Spawn a background task that prunes idle sessions every 60 seconds.
pub fn spawn_expiry_task(store: Arc<SessionStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            store.expire_idle().await;
        }
    })
}
