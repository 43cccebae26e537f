//! Infrastructure services

mod completion_cache;
mod completion_gateway;
mod conversation_service;
mod session_service;

pub use completion_cache::{CompletionCache, DEFAULT_COMPLETION_TTL};
pub use completion_gateway::CompletionGateway;
pub use conversation_service::{
    normalize_reply, ChatReply, ConversationService, ConversationServiceTrait, HISTORY_WINDOW,
    RETRIEVAL_THRESHOLD,
};
pub use session_service::{
    generate_session_id, SessionCreation, SessionService, SessionServiceTrait,
};
