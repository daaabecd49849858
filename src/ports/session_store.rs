//! Per-session conversation registry.

use std::sync::{Arc, Mutex};

use crate::domain::foundation::SessionId;
use crate::domain::triage::SymptomBot;

/// Handle to one conversation's dialogue state machine.
///
/// The mutex serializes turns: exactly one `handle` call is in flight per
/// conversation, which is the ownership discipline the triage core requires.
pub type SharedConversation = Arc<Mutex<SymptomBot>>;

/// Registry of live conversations keyed by session id.
///
/// The store is synchronous: conversations live in memory only (persistence
/// across restarts is an explicit non-goal) so there is no await point to
/// expose.
pub trait SessionStore: Send + Sync {
    /// Returns the conversation for `id`, creating a fresh one when absent.
    fn get_or_create(&self, id: SessionId) -> SharedConversation;

    /// Returns the conversation for `id` if it exists.
    fn get(&self, id: SessionId) -> Option<SharedConversation>;

    /// Forgets the conversation for `id`. Returns whether one existed.
    fn remove(&self, id: SessionId) -> bool;

    /// Number of live conversations.
    fn session_count(&self) -> usize;
}
