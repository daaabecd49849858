//! Axum routes for chat endpoints.
//!
//! Defines the routing table for the conversational triage API.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{chat, greeting, health, reset_chat, ChatAppState};

/// Creates routes for chat endpoints.
///
/// REST Endpoints:
/// - POST /api/chat - Handle one user utterance
/// - POST /api/chat/reset - Discard a conversation's state
/// - GET /api/chat/greeting - Open a conversation and return the introduction
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/reset", post(reset_chat))
        .route("/chat/greeting", get(greeting))
}

/// Combined router with all chat routes under /api plus the health probe.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new()
        .nest("/api", chat_routes())
        .route("/health", get(health))
}
