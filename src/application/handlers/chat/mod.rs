//! Chat conversation handlers.

mod reset_conversation;
mod send_message;
mod start_conversation;

pub use reset_conversation::{
    ResetConversationCommand, ResetConversationError, ResetConversationHandler,
};
pub use send_message::{SendMessageCommand, SendMessageHandler, SendMessageResult};
pub use start_conversation::{StartConversationHandler, StartConversationResult};
