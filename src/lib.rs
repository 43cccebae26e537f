//! Support Desk
//!
//! Documentation-grounded customer support chat backend:
//! - Lexical retrieval over a JSON documentation file
//! - Prompt assembly with recent conversation context
//! - Cached completions from Gemini, OpenAI, Claude, Mistral or Groq
//! - Sessions and message history persisted in SQLite

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use config::LlmConfig;
use domain::LlmSettings;
use infrastructure::{
    cache::{InMemoryCache, InMemoryCacheConfig},
    documents::DocumentStore,
    rate_limit::RateLimiter,
    services::{CompletionCache, CompletionGateway, ConversationService, SessionService},
    storage::{SqliteConfig, SqliteConversationRepository},
};
use tracing::info;

/// Wired application plus the handles needed at shutdown
pub struct Application {
    pub state: AppState,
    pub repository: Arc<SqliteConversationRepository>,
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    Ok(create_application(config).await?.state)
}

/// Resolve settings, open storage, load documentation and wire every service
pub async fn create_application(config: &AppConfig) -> anyhow::Result<Application> {
    let settings = resolve_llm_settings(&config.llm)?;

    let repository = Arc::new(
        SqliteConversationRepository::connect(
            &SqliteConfig::new(&config.database.path)
                .with_max_connections(config.database.max_connections),
        )
        .await?,
    );

    let documents = Arc::new(DocumentStore::load(&config.documents.path).await);

    let ttl = Duration::from_secs(config.cache.ttl_secs);
    let cache = InMemoryCache::with_config(
        InMemoryCacheConfig::default()
            .with_max_capacity(config.cache.max_capacity)
            .with_default_ttl(ttl),
    );
    let gateway = Arc::new(CompletionGateway::from_settings(
        &settings,
        CompletionCache::with_ttl(Arc::new(cache), ttl),
    )?);

    let conversation_service = Arc::new(ConversationService::new(
        repository.clone(),
        documents.clone(),
        gateway,
    ));
    let session_service = Arc::new(SessionService::new(repository.clone()));

    let mut state = AppState::new(conversation_service, session_service, documents)
        .with_allowed_origins(config.cors.allowed_origins.clone())
        .with_environment(config.server.environment.clone());

    if config.rate_limit.enabled {
        info!(
            max_requests = config.rate_limit.max_requests,
            window_secs = config.rate_limit.window_secs,
            "Rate limiting enabled"
        );
        state = state.with_rate_limiter(Arc::new(RateLimiter::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        )));
    }

    Ok(Application { state, repository })
}

/// Fallback variable for the provider key when `llm.api_key` is unset
pub const API_KEY_VARIABLE: &str = "LLM_API_KEY";

/// `llm.api_key` wins; otherwise [`API_KEY_VARIABLE`] is read
pub fn resolve_llm_settings(config: &LlmConfig) -> anyhow::Result<LlmSettings> {
    if config.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
        return Ok(config.resolve()?);
    }

    let config = LlmConfig {
        api_key: std::env::var(API_KEY_VARIABLE).ok(),
        ..config.clone()
    };

    Ok(config.resolve()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, ProviderKind};

    fn llm_config(provider: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            api_key: api_key.map(str::to_string),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_explicit_key_is_used() {
        let settings = resolve_llm_settings(&llm_config("groq", Some("gsk-1"))).unwrap();
        assert_eq!(settings.provider, ProviderKind::Groq);
        assert_eq!(settings.api_key(), "gsk-1");
    }

    #[test]
    fn test_unknown_provider_fails() {
        let err = resolve_llm_settings(&llm_config("cohere", Some("k"))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_application_in_memory() {
        let mut config = AppConfig::default();
        config.database.path = ":memory:".to_string();
        config.documents.path = "/nonexistent/docs.json".to_string();
        config.llm = llm_config("openai", Some("sk-test"));

        let app = create_application(&config).await.unwrap();

        assert!(app.state.rate_limiter.is_some());
        assert!(app.state.documents.documents().is_empty());
        assert_eq!(app.state.environment, "development");
        app.repository.close().await;
    }
}
