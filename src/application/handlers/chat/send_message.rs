//! SendMessageHandler - run one triage turn for a session.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

/// Command to handle one user utterance.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// Existing session to continue; `None` starts a fresh conversation.
    pub session_id: Option<SessionId>,
    pub message: String,
}

/// Result of one triage turn.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub session_id: SessionId,
    pub reply: String,
}

/// Handler for per-turn message exchange.
///
/// Infallible by design: the triage core resolves every utterance, including
/// empty or adversarial input, to some textual reply. An unknown session id
/// simply begins a fresh conversation under that id.
pub struct SendMessageHandler {
    sessions: Arc<dyn SessionStore>,
}

impl SendMessageHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub fn handle(&self, cmd: SendMessageCommand) -> SendMessageResult {
        let session_id = cmd.session_id.unwrap_or_else(SessionId::new);
        let conversation = self.sessions.get_or_create(session_id);
        let reply = conversation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .handle(&cmd.message);

        tracing::debug!(%session_id, "triage turn handled");
        SendMessageResult { session_id, reply }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::domain::triage::{ConditionCatalog, ConditionRecord, TriageEngine};

    fn handler() -> (SendMessageHandler, Arc<InMemorySessionStore>) {
        let engine = TriageEngine::new(ConditionCatalog::new(vec![
            ConditionRecord::new("Flu", vec!["fever".to_string(), "cough".to_string()]),
            ConditionRecord::new(
                "Common Cold",
                vec!["cough".to_string(), "runny nose".to_string()],
            ),
        ]));
        let sessions = Arc::new(InMemorySessionStore::new(Arc::new(engine)));
        (SendMessageHandler::new(sessions.clone()), sessions)
    }

    #[test]
    fn missing_session_id_starts_fresh_conversation() {
        let (handler, sessions) = handler();

        let result = handler.handle(SendMessageCommand {
            session_id: None,
            message: "i have fever".to_string(),
        });

        assert!(!result.reply.is_empty());
        assert!(sessions.get(result.session_id).is_some());
    }

    #[test]
    fn turns_for_the_same_session_accumulate_state() {
        let (handler, sessions) = handler();

        let first = handler.handle(SendMessageCommand {
            session_id: None,
            message: "i have fever".to_string(),
        });
        handler.handle(SendMessageCommand {
            session_id: Some(first.session_id),
            message: "yes".to_string(),
        });

        let conversation = sessions.get(first.session_id).unwrap();
        let bot = conversation.lock().unwrap();
        assert!(bot.state().confirmed().contains("fever"));
        assert!(bot.state().confirmed().contains("cough"));
    }

    #[test]
    fn empty_message_still_yields_a_reply() {
        let (handler, _) = handler();

        let result = handler.handle(SendMessageCommand {
            session_id: None,
            message: String::new(),
        });

        assert!(!result.reply.is_empty());
    }
}
