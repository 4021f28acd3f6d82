use std::sync::Arc;

use claim_wizard::WizardSession;
use dashmap::DashMap;
use tokio::sync::Mutex;

pub type SharedSession = Arc<Mutex<WizardSession>>;

/// In-memory store of live wizard sessions. Each session sits behind its own
/// mutex: a submission holds the lock for its whole round trip, which makes
/// that one session non-interactive while in flight without touching any
/// other session.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SharedSession>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: WizardSession) -> SharedSession {
        let id = session.id().to_string();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&shared));
        shared
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop a session. Its uploads, and with them their preview entries, are
    /// released once the last handler holding the `Arc` lets go.
    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}
