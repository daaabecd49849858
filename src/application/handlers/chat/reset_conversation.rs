//! ResetConversationHandler - discard a session's conversation state.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

/// Command to reset a conversation.
#[derive(Debug, Clone)]
pub struct ResetConversationCommand {
    pub session_id: SessionId,
}

/// Error type for resetting a conversation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResetConversationError {
    #[error("conversation not found for session: {0}")]
    NotFound(SessionId),
}

/// Handler for explicit conversation resets.
pub struct ResetConversationHandler {
    sessions: Arc<dyn SessionStore>,
}

impl ResetConversationHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub fn handle(&self, cmd: ResetConversationCommand) -> Result<(), ResetConversationError> {
        let conversation = self
            .sessions
            .get(cmd.session_id)
            .ok_or(ResetConversationError::NotFound(cmd.session_id))?;
        conversation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .reset();

        tracing::debug!(session_id = %cmd.session_id, "conversation reset");
        Ok(())
    }
}
