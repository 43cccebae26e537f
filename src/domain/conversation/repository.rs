//! Conversation persistence trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{ConversationTurn, MessageRole, Session, SessionSummary};
use crate::domain::DomainError;

/// Storage for sessions and their messages.
///
/// Deleting a session removes its messages as well.
#[async_trait]
pub trait ConversationRepository: Send + Sync + Debug {
    /// Creates the session if missing, otherwise bumps `updated_at`
    async fn ensure_session(&self, id: &str) -> Result<Session, DomainError>;

    /// Creates a session; returns false if it already existed
    async fn create_session(&self, id: &str) -> Result<bool, DomainError>;

    async fn get_session(&self, id: &str) -> Result<Option<SessionSummary>, DomainError>;

    /// All sessions, most recently updated first
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, DomainError>;

    /// Returns false if the session did not exist
    async fn delete_session(&self, id: &str) -> Result<bool, DomainError>;

    /// Removes all messages but keeps the session; false if it did not exist
    async fn clear_session(&self, id: &str) -> Result<bool, DomainError>;

    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ConversationTurn, DomainError>;

    /// The last `limit` messages, oldest first
    async fn recent_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, DomainError>;

    /// Every message of the session, oldest first
    async fn messages(&self, session_id: &str) -> Result<Vec<ConversationTurn>, DomainError>;
}
