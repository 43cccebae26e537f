//! Session and documentation endpoint bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use crate::domain::SessionSummary;

/// `POST /api/sessions` body; the id is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<Value>,
}

impl CreateSessionRequest {
    /// `Ok(None)` when absent or null, 400 when present but not a non-empty string
    pub fn requested_id(&self) -> Result<Option<&str>, ApiError> {
        match &self.session_id {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(id)) if !id.trim().is_empty() => Ok(Some(id.as_str())),
            Some(_) => Err(ApiError::bad_request(
                "sessionId must be a non-empty string",
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub success: bool,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionExistsResponse {
    pub success: bool,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub success: bool,
    pub sessions: Vec<SessionSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: SessionSummary,
}

#[derive(Debug, Serialize)]
pub struct SessionDeletedResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "deletedSessionId")]
    pub deleted_session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionClearedResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub success: bool,
    pub total: usize,
    pub titles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentReloadResponse {
    pub success: bool,
    pub total: usize,
}
