//! Process-wide registry of active sessions.

use std::sync::Arc;

use dashmap::DashMap;

use crate::session::{Session, SessionId};

/// Registry of all connected sessions.
///
/// Used for observability only: the health endpoint reads the count, and
/// nothing else depends on it. Holds at most one session per live
/// connection; removal happens synchronously with the close path.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<Session>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Insert a session. Replaces any previous entry with the same id.
    pub fn insert(&self, session: Arc<Session>) {
        let _ = self.sessions.insert(session.id.clone(), session);
    }

    /// Remove a session by id. Removing an absent id is a no-op.
    pub fn remove(&self, id: &SessionId) {
        let _ = self.sessions.remove(id);
    }

    /// Look up a session by id.
    pub fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of active sessions.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
