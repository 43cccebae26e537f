//! Request and response bodies of the support API

pub mod chat;
pub mod error;
pub mod json;
pub mod session;

pub use chat::{ChatHistoryResponse, ChatRequest, ChatResponse};
pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse};
pub use json::Json;
pub use session::{
    CreateSessionRequest, DocumentListResponse, DocumentReloadResponse, SessionClearedResponse,
    SessionCreatedResponse, SessionDeletedResponse, SessionExistsResponse, SessionListResponse,
    SessionResponse,
};
