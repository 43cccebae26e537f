//! Session service - lifecycle of chat sessions

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::{info, instrument};

use crate::domain::{ConversationRepository, DomainError, SessionSummary};

const SUFFIX_LEN: usize = 9;

/// Result of a create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCreation {
    Created(String),
    AlreadyExists(String),
}

impl SessionCreation {
    pub fn session_id(&self) -> &str {
        match self {
            Self::Created(id) | Self::AlreadyExists(id) => id,
        }
    }
}

/// Trait for session operations (for dynamic dispatch in AppState)
#[async_trait]
pub trait SessionServiceTrait: Send + Sync + Debug {
    /// Create a session, generating an id when none is given
    async fn create(&self, session_id: Option<&str>) -> Result<SessionCreation, DomainError>;

    async fn list(&self) -> Result<Vec<SessionSummary>, DomainError>;

    async fn get(&self, session_id: &str) -> Result<SessionSummary, DomainError>;

    async fn delete(&self, session_id: &str) -> Result<(), DomainError>;

    /// Drop all messages while keeping the session
    async fn clear(&self, session_id: &str) -> Result<(), DomainError>;
}

#[derive(Debug)]
pub struct SessionService<R: ConversationRepository> {
    repository: Arc<R>,
}

impl<R: ConversationRepository> SessionService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: ConversationRepository + 'static> SessionServiceTrait for SessionService<R> {
    #[instrument(skip(self))]
    async fn create(&self, session_id: Option<&str>) -> Result<SessionCreation, DomainError> {
        let id = match session_id {
            Some(id) if id.trim().is_empty() => {
                return Err(DomainError::validation(
                    "sessionId must be a non-empty string",
                ));
            }
            Some(id) => id.to_string(),
            None => generate_session_id(),
        };

        if self.repository.create_session(&id).await? {
            info!(session_id = %id, "Session created");
            Ok(SessionCreation::Created(id))
        } else {
            Ok(SessionCreation::AlreadyExists(id))
        }
    }

    async fn list(&self) -> Result<Vec<SessionSummary>, DomainError> {
        self.repository.list_sessions().await
    }

    async fn get(&self, session_id: &str) -> Result<SessionSummary, DomainError> {
        require_id(session_id)?;

        self.repository
            .get_session(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session not found"))
    }

    #[instrument(skip(self))]
    async fn delete(&self, session_id: &str) -> Result<(), DomainError> {
        require_id(session_id)?;

        if !self.repository.delete_session(session_id).await? {
            return Err(DomainError::not_found("Session not found"));
        }

        info!(session_id = %session_id, "Session deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self, session_id: &str) -> Result<(), DomainError> {
        require_id(session_id)?;

        if !self.repository.clear_session(session_id).await? {
            return Err(DomainError::not_found("Session not found"));
        }

        info!(session_id = %session_id, "Session messages cleared");
        Ok(())
    }
}

fn require_id(session_id: &str) -> Result<(), DomainError> {
    if session_id.trim().is_empty() {
        return Err(DomainError::validation("Invalid sessionId"));
    }
    Ok(())
}

/// `session_<unix-millis>_<9 base36 chars>`
pub fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect();

    format!("session_{}_{}", Utc::now().timestamp_millis(), suffix)
}
