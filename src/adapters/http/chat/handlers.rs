//! HTTP handlers for chat endpoints.
//!
//! These handlers connect Axum routes to application layer operations.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::chat::{
    ResetConversationCommand, ResetConversationError, ResetConversationHandler,
    SendMessageCommand, SendMessageHandler, StartConversationHandler,
};
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

use super::dto::{ChatRequest, ChatResponse, ErrorResponse, ResetRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub start_conversation: Arc<StartConversationHandler>,
    pub send_message: Arc<SendMessageHandler>,
    pub reset_conversation: Arc<ResetConversationHandler>,
}

impl ChatAppState {
    /// Wires the chat handlers over one session store.
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            start_conversation: Arc::new(StartConversationHandler::new(sessions.clone())),
            send_message: Arc::new(SendMessageHandler::new(sessions.clone())),
            reset_conversation: Arc::new(ResetConversationHandler::new(sessions)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════════

/// API-level errors for chat endpoints.
#[derive(Debug, Clone)]
pub enum ChatApiError {
    BadRequest(String),
    NotFound(&'static str, String),
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        match self {
            ChatApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(message)),
            )
                .into_response(),
            ChatApiError::NotFound(resource, id) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::not_found(resource, &id)),
            )
                .into_response(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/chat/greeting
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/chat/greeting - Open a conversation and return the introduction.
pub async fn greeting(State(state): State<ChatAppState>) -> impl IntoResponse {
    let result = state.start_conversation.handle();
    (
        StatusCode::OK,
        Json(ChatResponse {
            session_id: result.session_id.to_string(),
            reply: result.reply,
        }),
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/chat
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Handle one user utterance.
///
/// A missing session id starts a fresh conversation; an unknown one starts a
/// fresh conversation under that id, so retried requests stay idempotent.
///
/// # Errors
/// - 400 Bad Request: malformed session id
pub async fn chat(
    State(state): State<ChatAppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id = match &request.session_id {
        Some(raw) => Some(parse_session_id(raw)?),
        None => None,
    };

    let result = state.send_message.handle(SendMessageCommand {
        session_id,
        message: request.message,
    });

    Ok((
        StatusCode::OK,
        Json(ChatResponse {
            session_id: result.session_id.to_string(),
            reply: result.reply,
        }),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/chat/reset
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat/reset - Discard a conversation's state.
///
/// # Errors
/// - 400 Bad Request: malformed session id
/// - 404 Not Found: unknown session
pub async fn reset_chat(
    State(state): State<ChatAppState>,
    Json(request): Json<ResetRequest>,
) -> Result<StatusCode, ChatApiError> {
    let session_id = parse_session_id(&request.session_id)?;

    state
        .reset_conversation
        .handle(ResetConversationCommand { session_id })
        .map_err(|e| match e {
            ResetConversationError::NotFound(id) => {
                ChatApiError::NotFound("Conversation", id.to_string())
            }
        })?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /health
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

fn parse_session_id(raw: &str) -> Result<SessionId, ChatApiError> {
    raw.parse()
        .map_err(|_| ChatApiError::BadRequest("Invalid session ID format".to_string()))
}
