//! Conversation orchestration - the chat turn pipeline

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::CompletionGateway;
use crate::domain::prompt::REFUSAL_PHRASE;
use crate::domain::{
    build_prompt, find_relevant, format_documentation, format_history, ConversationRepository,
    ConversationTurn, DomainError, MessageRole,
};
use crate::infrastructure::documents::DocumentStore;

/// Number of stored turns included as conversation context
pub const HISTORY_WINDOW: usize = 6;

/// Minimum score a document needs to be offered to the model
pub const RETRIEVAL_THRESHOLD: f64 = 0.5;

const REFUSAL_MARKERS: [&str; 2] = ["i don't have information", "i don't have enough information"];

/// Assistant answer for one chat turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(rename = "tokensUsed")]
    pub tokens_used: u32,
    pub timestamp: DateTime<Utc>,
}

/// Trait for conversation operations (for dynamic dispatch in AppState)
#[async_trait]
pub trait ConversationServiceTrait: Send + Sync + Debug {
    /// Run one chat turn and persist both sides of it
    async fn send_message(&self, session_id: &str, message: &str)
        -> Result<ChatReply, DomainError>;

    /// All stored turns of a session, oldest first
    async fn history(&self, session_id: &str) -> Result<Vec<ConversationTurn>, DomainError>;
}

/// Conversation service wiring storage, retrieval and the completion gateway
#[derive(Debug)]
pub struct ConversationService<R: ConversationRepository> {
    repository: Arc<R>,
    documents: Arc<DocumentStore>,
    gateway: Arc<CompletionGateway>,
}

impl<R: ConversationRepository> ConversationService<R> {
    pub fn new(
        repository: Arc<R>,
        documents: Arc<DocumentStore>,
        gateway: Arc<CompletionGateway>,
    ) -> Self {
        Self {
            repository,
            documents,
            gateway,
        }
    }

    async fn context_for(&self, session_id: &str) -> Result<String, DomainError> {
        let recent = self
            .repository
            .recent_messages(session_id, HISTORY_WINDOW)
            .await?;

        Ok(format_history(&recent))
    }

    fn documentation_for(&self, message: &str) -> String {
        let documents = self.documents.documents();
        let relevant = find_relevant(message, &documents, RETRIEVAL_THRESHOLD);

        debug!(
            candidates = documents.len(),
            matched = relevant.len(),
            "Documentation retrieved"
        );

        format_documentation(&relevant)
    }
}

#[async_trait]
impl<R: ConversationRepository + 'static> ConversationServiceTrait for ConversationService<R> {
    #[instrument(skip(self, message), fields(session_id = %session_id))]
    async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatReply, DomainError> {
        if session_id.trim().is_empty() {
            return Err(DomainError::validation(
                "sessionId is required and must be a non-empty string",
            ));
        }
        // Only the stored turn is trimmed; retrieval and the prompt see the raw text.
        let stored = message.trim();
        if stored.is_empty() {
            return Err(DomainError::validation(
                "message is required and must be a non-empty string",
            ));
        }

        self.repository.ensure_session(session_id).await?;
        self.repository
            .append_message(session_id, MessageRole::User, stored)
            .await?;

        let context = self.context_for(session_id).await?;
        let documentation = self.documentation_for(message);
        let prompt = build_prompt(message, &documentation, &context);

        let completion = self.gateway.complete(&prompt).await.map_err(|e| {
            if e.is_provider_error() {
                e
            } else {
                warn!(error = %e, "Completion failed outside the provider");
                DomainError::provider(self.gateway.provider_name(), e.to_string())
            }
        })?;

        let reply = normalize_reply(&completion.reply);
        self.repository
            .append_message(session_id, MessageRole::Assistant, &reply)
            .await?;

        info!(tokens_used = completion.tokens_used, "Chat turn completed");

        Ok(ChatReply {
            reply,
            tokens_used: completion.tokens_used,
            timestamp: Utc::now(),
        })
    }

    #[instrument(skip(self), fields(session_id = %session_id))]
    async fn history(&self, session_id: &str) -> Result<Vec<ConversationTurn>, DomainError> {
        if session_id.trim().is_empty() {
            return Err(DomainError::validation("Invalid sessionId"));
        }

        if self.repository.get_session(session_id).await?.is_none() {
            return Err(DomainError::not_found("Session not found"));
        }

        self.repository.messages(session_id).await
    }
}

/// Collapses empty answers and "no information" variants into the canonical refusal
pub fn normalize_reply(reply: &str) -> String {
    let lowered = reply.to_lowercase();

    if reply.trim().is_empty() || REFUSAL_MARKERS.iter().any(|m| lowered.contains(m)) {
        REFUSAL_PHRASE.to_string()
    } else {
        reply.to_string()
    }
}
