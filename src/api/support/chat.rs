//! Chat endpoint handlers

use axum::extract::{Path, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatHistoryResponse, ChatRequest, ChatResponse, Json};

/// POST /api/chat
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let reply = state
        .conversation_service
        .send_message(request.session_id(), request.message())
        .await?;

    Ok(Json(ChatResponse::from(reply)))
}

/// GET /api/chat/{session_id}
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ChatHistoryResponse>, ApiError> {
    debug!(session_id = %session_id, "Loading chat history");

    let messages = state.conversation_service.history(&session_id).await?;

    Ok(Json(ChatHistoryResponse {
        success: true,
        session_id,
        total: messages.len(),
        messages,
    }))
}
