//! StartConversationHandler - open a session and return the greeting.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

/// Result of starting a conversation.
#[derive(Debug, Clone)]
pub struct StartConversationResult {
    pub session_id: SessionId,
    pub reply: String,
}

/// Handler for opening a fresh conversation.
pub struct StartConversationHandler {
    sessions: Arc<dyn SessionStore>,
}

impl StartConversationHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Allocates a session and returns the fixed introduction.
    pub fn handle(&self) -> StartConversationResult {
        let session_id = SessionId::new();
        let conversation = self.sessions.get_or_create(session_id);
        let reply = conversation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .greet();

        tracing::debug!(%session_id, "conversation started");
        StartConversationResult { session_id, reply }
    }
}
