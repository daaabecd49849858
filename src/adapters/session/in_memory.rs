//! In-memory session registry.
//!
//! Keeps one dialogue state machine per session id, created lazily over the
//! shared engine. Conversation history lives only as long as the process;
//! persistence across restarts is an explicit non-goal.
//!
//! # Panics
//!
//! Methods panic if the internal registry lock is poisoned, matching the
//! process-fatal handling of other unrecoverable startup state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::foundation::SessionId;
use crate::domain::triage::{SymptomBot, TriageEngine};
use crate::ports::{SessionStore, SharedConversation};

/// Registry of live conversations backed by a `RwLock`ed map.
///
/// The engine is shared immutably across all conversations; each session
/// owns its bot behind a per-session mutex, which serializes turns for that
/// conversation.
pub struct InMemorySessionStore {
    engine: Arc<TriageEngine>,
    sessions: RwLock<HashMap<SessionId, SharedConversation>>,
}

impl InMemorySessionStore {
    /// Creates an empty registry over the shared engine.
    pub fn new(engine: Arc<TriageEngine>) -> Self {
        Self {
            engine,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, id: SessionId) -> SharedConversation {
        if let Some(conversation) = self
            .sessions
            .read()
            .expect("InMemorySessionStore: registry lock poisoned")
            .get(&id)
        {
            return Arc::clone(conversation);
        }

        let mut sessions = self
            .sessions
            .write()
            .expect("InMemorySessionStore: registry lock poisoned");
        let conversation = sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(SymptomBot::new(Arc::clone(&self.engine)))));
        Arc::clone(conversation)
    }

    fn get(&self, id: SessionId) -> Option<SharedConversation> {
        self.sessions
            .read()
            .expect("InMemorySessionStore: registry lock poisoned")
            .get(&id)
            .map(Arc::clone)
    }

    fn remove(&self, id: SessionId) -> bool {
        self.sessions
            .write()
            .expect("InMemorySessionStore: registry lock poisoned")
            .remove(&id)
            .is_some()
    }

    fn session_count(&self) -> usize {
        self.sessions
            .read()
            .expect("InMemorySessionStore: registry lock poisoned")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::{ConditionCatalog, ConditionRecord};

    fn store() -> InMemorySessionStore {
        let engine = TriageEngine::new(ConditionCatalog::new(vec![ConditionRecord::new(
            "Flu",
            vec!["fever".to_string(), "cough".to_string()],
        )]));
        InMemorySessionStore::new(Arc::new(engine))
    }

    #[test]
    fn get_or_create_returns_same_conversation_for_same_id() {
        let store = store();
        let id = SessionId::new();

        let first = store.get_or_create(id);
        first
            .lock()
            .unwrap()
            .handle("i have fever");
        let second = store.get_or_create(id);

        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.lock().unwrap().state().confirmed().contains("fever"));
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn distinct_sessions_are_isolated() {
        let store = store();
        let a = store.get_or_create(SessionId::new());
        let b = store.get_or_create(SessionId::new());

        a.lock().unwrap().handle("i have fever");

        assert!(b.lock().unwrap().state().confirmed().is_empty());
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn get_does_not_create() {
        let store = store();
        assert!(store.get(SessionId::new()).is_none());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn remove_forgets_the_conversation() {
        let store = store();
        let id = SessionId::new();
        store.get_or_create(id);

        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.get(id).is_none());
    }
}
