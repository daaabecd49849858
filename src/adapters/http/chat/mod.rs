//! Chat HTTP adapter.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{ChatApiError, ChatAppState};
pub use routes::{chat_router, chat_routes};
