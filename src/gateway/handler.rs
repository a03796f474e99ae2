//! HTTP handlers for the chat API
//!
//! - POST /api/chat:  run one agent turn in a session
//! - POST /api/clear: drop a session's history
//! - GET  /api/stats: record counts across the documents

use crate::agent::{Agent, ChatMessage};
use crate::documents::Documents;
use crate::session::SessionStore;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Session used when a request names none
pub const DEFAULT_SESSION: &str = "default";

/// Shared state for chat handlers
#[derive(Clone)]
pub struct ChatState {
    pub agent: Arc<Agent>,
    pub sessions: SessionStore,
    pub documents: Arc<Documents>,
    /// Messages kept per session after each turn
    pub history_limit: usize,
}

/// Create the chat router
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/clear", post(clear_history))
        .route("/api/stats", get(get_stats))
        .with_state(state)
}

fn default_session() -> String {
    DEFAULT_SESSION.to_string()
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    #[serde(default = "default_session")]
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct ClearRequest {
    #[serde(default = "default_session")]
    session_id: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/chat
///
/// The body is decoded by hand so that a missing or non-JSON body gets the
/// same 400 payload as an empty message.
async fn chat(State(state): State<ChatState>, body: Bytes) -> impl IntoResponse {
    let request = match serde_json::from_slice::<ChatRequest>(&body) {
        Ok(req) if !req.message.is_empty() => req,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "No message provided"})),
            )
        }
    };
    let session_id = request.session_id.as_str();

    let _turn = state.sessions.lock(session_id).await;
    let history = state.sessions.get(session_id).await;

    match state.agent.run(&history, &request.message).await {
        Ok(response) => {
            state
                .sessions
                .append(
                    session_id,
                    [
                        ChatMessage::user(request.message.as_str()),
                        ChatMessage::assistant(response.as_str()),
                    ],
                )
                .await;
            state.sessions.trim(session_id, state.history_limit).await;

            (
                StatusCode::OK,
                Json(serde_json::json!({"response": response, "success": true})),
            )
        }
        Err(e) => {
            tracing::error!(session_id, "Chat turn failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string(), "success": false})),
            )
        }
    }
}

/// POST /api/clear
async fn clear_history(State(state): State<ChatState>, body: Bytes) -> impl IntoResponse {
    let session_id = serde_json::from_slice::<ClearRequest>(&body)
        .map(|r| r.session_id)
        .unwrap_or_else(|_| default_session());

    state.sessions.clear(&session_id).await;
    Json(serde_json::json!({"success": true, "message": "History cleared"}))
}

/// GET /api/stats
async fn get_stats(State(state): State<ChatState>) -> impl IntoResponse {
    match state.documents.stats().await {
        Ok(stats) => (
            StatusCode::OK,
            Json(serde_json::json!({"success": true, "stats": stats})),
        ),
        Err(e) => {
            tracing::warn!("Failed to compute document stats: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string(), "success": false})),
            )
        }
    }
}
