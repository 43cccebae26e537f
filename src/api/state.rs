//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::documents::DocumentStore;
use crate::infrastructure::rate_limit::RateLimiter;
use crate::infrastructure::services::{ConversationServiceTrait, SessionServiceTrait};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<dyn ConversationServiceTrait>,
    pub session_service: Arc<dyn SessionServiceTrait>,
    pub documents: Arc<DocumentStore>,
    /// `None` disables throttling
    pub rate_limiter: Option<Arc<RateLimiter>>,
    pub allowed_origins: Vec<String>,
    pub environment: String,
}

impl AppState {
    pub fn new(
        conversation_service: Arc<dyn ConversationServiceTrait>,
        session_service: Arc<dyn SessionServiceTrait>,
        documents: Arc<DocumentStore>,
    ) -> Self {
        Self {
            conversation_service,
            session_service,
            documents,
            rate_limiter: None,
            allowed_origins: Vec::new(),
            environment: "development".to_string(),
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("documents", &self.documents.documents().len())
            .field("rate_limited", &self.rate_limiter.is_some())
            .field("allowed_origins", &self.allowed_origins)
            .field("environment", &self.environment)
            .finish()
    }
}
