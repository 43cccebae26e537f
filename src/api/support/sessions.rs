//! Session endpoint handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::api::state::AppState;
use crate::api::types::json::parse_optional_body;
use crate::api::types::{
    ApiError, CreateSessionRequest, Json, SessionClearedResponse, SessionCreatedResponse,
    SessionDeletedResponse, SessionExistsResponse, SessionListResponse, SessionResponse,
};
use crate::infrastructure::services::SessionCreation;

/// POST /api/sessions
///
/// The body is optional; without one a session id is generated.
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: CreateSessionRequest = parse_optional_body(&body)?;
    let requested = request.requested_id()?;

    let response = match state.session_service.create(requested).await? {
        SessionCreation::Created(session_id) => (
            StatusCode::CREATED,
            Json(SessionCreatedResponse {
                success: true,
                session_id,
                created_at: Utc::now(),
            }),
        )
            .into_response(),
        SessionCreation::AlreadyExists(session_id) => Json(SessionExistsResponse {
            success: true,
            session_id,
            message: "Session already exists",
        })
        .into_response(),
    };

    Ok(response)
}

/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let sessions = state.session_service.list().await?;

    Ok(Json(SessionListResponse {
        success: true,
        total: sessions.len(),
        sessions,
    }))
}

/// GET /api/sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.session_service.get(&session_id).await?;

    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

/// DELETE /api/sessions/{session_id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionDeletedResponse>, ApiError> {
    state.session_service.delete(&session_id).await?;

    Ok(Json(SessionDeletedResponse {
        success: true,
        message: "Session deleted successfully",
        deleted_session_id: session_id,
    }))
}

/// POST /api/sessions/{session_id}/clear
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionClearedResponse>, ApiError> {
    state.session_service.clear(&session_id).await?;

    Ok(Json(SessionClearedResponse {
        success: true,
        message: "Session messages cleared successfully",
        session_id,
    }))
}
