//! Support API endpoints mounted under `/api`

pub mod chat;
pub mod docs;
pub mod sessions;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create the `/api` router
pub fn create_support_router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::send_message))
        .route("/chat/{session_id}", get(chat::get_history))
        .route("/conversations", post(chat::send_message))
        .route("/conversations/{session_id}", get(chat::get_history))
        .route(
            "/sessions",
            post(sessions::create_session).get(sessions::list_sessions),
        )
        .route(
            "/sessions/{session_id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/sessions/{session_id}/clear", post(sessions::clear_session))
        .route("/docs", get(docs::list_documents))
        .route("/docs/reload", post(docs::reload_documents))
}
