//! In-memory conversation store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    ConversationRepository, ConversationTurn, DomainError, MessageRole, Session, SessionSummary,
};

#[derive(Debug, Default)]
struct State {
    sessions: HashMap<String, Session>,
    messages: Vec<ConversationTurn>,
    next_message_id: i64,
}

impl State {
    fn summary(&self, session: &Session) -> SessionSummary {
        SessionSummary {
            id: session.id.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            message_count: self
                .messages
                .iter()
                .filter(|m| m.session_id == session.id)
                .count() as i64,
        }
    }
}

/// Thread-safe in-memory conversation store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryConversationRepository {
    state: RwLock<State>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, DomainError> {
        self.state
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, DomainError> {
        self.state
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn ensure_session(&self, id: &str) -> Result<Session, DomainError> {
        let now = Utc::now();
        let mut state = self.write()?;

        let session = state
            .sessions
            .entry(id.to_string())
            .and_modify(|s| s.updated_at = now)
            .or_insert_with(|| Session {
                id: id.to_string(),
                created_at: now,
                updated_at: now,
            });

        Ok(session.clone())
    }

    async fn create_session(&self, id: &str) -> Result<bool, DomainError> {
        let now = Utc::now();
        let mut state = self.write()?;

        if state.sessions.contains_key(id) {
            return Ok(false);
        }

        state.sessions.insert(
            id.to_string(),
            Session {
                id: id.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(true)
    }

    async fn get_session(&self, id: &str) -> Result<Option<SessionSummary>, DomainError> {
        let state = self.read()?;
        Ok(state.sessions.get(id).map(|s| state.summary(s)))
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, DomainError> {
        let state = self.read()?;

        let mut sessions: Vec<SessionSummary> =
            state.sessions.values().map(|s| state.summary(s)).collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(sessions)
    }

    async fn delete_session(&self, id: &str) -> Result<bool, DomainError> {
        let mut state = self.write()?;

        if state.sessions.remove(id).is_none() {
            return Ok(false);
        }

        state.messages.retain(|m| m.session_id != id);
        Ok(true)
    }

    async fn clear_session(&self, id: &str) -> Result<bool, DomainError> {
        let mut state = self.write()?;

        match state.sessions.get_mut(id) {
            Some(session) => session.updated_at = Utc::now(),
            None => return Ok(false),
        }

        state.messages.retain(|m| m.session_id != id);
        Ok(true)
    }

    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ConversationTurn, DomainError> {
        let mut state = self.write()?;

        if !state.sessions.contains_key(session_id) {
            return Err(DomainError::storage(format!(
                "Cannot store message for unknown session '{}'",
                session_id
            )));
        }

        state.next_message_id += 1;
        let turn = ConversationTurn {
            id: state.next_message_id,
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        state.messages.push(turn.clone());

        Ok(turn)
    }

    async fn recent_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, DomainError> {
        let all = self.messages(session_id).await?;
        let skip = all.len().saturating_sub(limit);

        Ok(all.into_iter().skip(skip).collect())
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<ConversationTurn>, DomainError> {
        let state = self.read()?;

        Ok(state
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect())
    }
}
