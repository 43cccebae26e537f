//! Conversation domain - sessions and their message history

mod entity;
mod repository;

pub use entity::{ConversationTurn, MessageRole, Session, SessionSummary};
pub use repository::ConversationRepository;
