//! In-memory session table.
//!
//! Sessions live only in process memory and are lost on restart. A single async mutex
//! guards the table and is never held across I/O. Expired sessions are invisible to
//! readers; they are removed lazily on read and by the hourly sweep.

use std::{collections::HashMap, sync::Arc};

use chrono::Duration;
use dioxus_logger::tracing;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::server::{model::session::Session, util::clock::Clock};

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Creates an empty store.
    ///
    /// # Arguments
    /// - `lifetime` - How long a session stays active after creation
    /// - `clock` - Time source used for expiry checks
    pub fn new(lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            lifetime,
            clock,
        }
    }

    /// Creates a session for a Discord user.
    ///
    /// # Arguments
    /// - `subject_id` - Discord ID of the authenticated user
    /// - `attributes` - Discord user payload to keep with the session
    ///
    /// # Returns
    /// - `Session` - The stored session with a fresh UUID v4 identifier
    pub async fn create(&self, subject_id: &str, attributes: Value) -> Session {
        let created_at = self.clock.now();
        let session = Session {
            session_id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            attributes,
            created_at,
            expires_at: created_at + self.lifetime,
        };

        self.sessions
            .lock()
            .await
            .insert(session.session_id.clone(), session.clone());

        tracing::info!(
            "Created session {} for Discord user {}",
            session.session_id,
            subject_id
        );

        session
    }

    /// Looks up an active session.
    ///
    /// An expired session is deleted and reported as absent.
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;

        match sessions.get(session_id) {
            Some(session) if session.is_active(now) => Some(session.clone()),
            Some(_) => {
                sessions.remove(session_id);
                None
            }
            None => None,
        }
    }

    /// Deletes a session.
    ///
    /// # Returns
    /// - `true` - The session existed and was removed
    /// - `false` - No session with that identifier
    pub async fn delete(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().await.remove(session_id).is_some();

        if removed {
            tracing::info!("Deleted session {}", session_id);
        }

        removed
    }

    /// Removes every expired session and returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let removed = {
            let mut sessions = self.sessions.lock().await;
            let before = sessions.len();
            sessions.retain(|_, session| session.expires_at > now);
            before - sessions.len()
        };

        if removed > 0 {
            tracing::info!("Cleaned up {} expired sessions", removed);
        }

        removed
    }

    /// Number of active sessions, after sweeping expired ones.
    pub async fn active_count(&self) -> usize {
        self.cleanup_expired().await;
        self.sessions.lock().await.len()
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}
