//! In-Memory Session Repository
//!
//! HashMap-backed store for use-case and pipeline tests, and for running
//! the server without a database in development tooling.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::SessionRepository;
use crate::domain::session::Session;
use crate::error::{GateError, GateResult};

/// In-memory session repository
#[derive(Clone, Default)]
pub struct MemorySessionRepository {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> GateResult<std::sync::MutexGuard<'_, HashMap<Uuid, Session>>> {
        self.sessions
            .lock()
            .map_err(|_| GateError::Internal("session store lock poisoned".to_string()))
    }

    /// Number of stored sessions (test helper)
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether the store is empty (test helper)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionRepository for MemorySessionRepository {
    async fn create(&self, session: &Session) -> GateResult<()> {
        self.lock()?.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> GateResult<Option<Session>> {
        Ok(self.lock()?.get(&session_id).cloned())
    }

    async fn update(&self, session: &Session) -> GateResult<()> {
        self.lock()?.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> GateResult<()> {
        self.lock()?.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> GateResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut sessions = self.lock()?;

        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at_ms >= now_ms);

        Ok((before - sessions.len()) as u64)
    }
}
