//! Documentation endpoint handlers

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{DocumentListResponse, DocumentReloadResponse, Json};

/// GET /api/docs
pub async fn list_documents(State(state): State<AppState>) -> Json<DocumentListResponse> {
    let documents = state.documents.documents();

    Json(DocumentListResponse {
        success: true,
        total: documents.len(),
        titles: documents.iter().map(|d| d.title.clone()).collect(),
    })
}

/// POST /api/docs/reload
pub async fn reload_documents(State(state): State<AppState>) -> Json<DocumentReloadResponse> {
    let total = state.documents.reload().await;
    info!(total, "Documentation reload requested");

    Json(DocumentReloadResponse {
        success: true,
        total,
    })
}
