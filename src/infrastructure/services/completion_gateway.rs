//! Cache-first access to the configured completion provider

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use super::CompletionCache;
use crate::domain::{Completion, CompletionProvider, DomainError, GenerationParams, LlmSettings};
use crate::infrastructure::llm::LlmProviderFactory;
use crate::infrastructure::observability::{record_llm_request, LlmOutcome};

/// Sends prompts to the provider chosen at startup, memoizing successes
#[derive(Debug, Clone)]
pub struct CompletionGateway {
    provider: Arc<dyn CompletionProvider>,
    cache: CompletionCache,
    params: GenerationParams,
}

impl CompletionGateway {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        cache: CompletionCache,
        params: GenerationParams,
    ) -> Self {
        Self {
            provider,
            cache,
            params,
        }
    }

    /// Build the provider described by `settings` on a reqwest client
    pub fn from_settings(settings: &LlmSettings, cache: CompletionCache) -> Result<Self, DomainError> {
        let provider = LlmProviderFactory::create(settings)?;

        info!(
            provider = provider.provider_name(),
            model = provider.model(),
            "Completion provider configured"
        );

        Ok(Self::new(provider, cache, settings.params))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Answer `prompt`, from cache when a fresh entry exists.
    ///
    /// Only successful completions are cached.
    #[instrument(skip_all, fields(provider = self.provider.provider_name()))]
    pub async fn complete(&self, prompt: &str) -> Result<Completion, DomainError> {
        if let Some(cached) = self.cache.get(prompt).await {
            info!("Using cached completion");
            return Ok(cached);
        }

        let started = Instant::now();
        let result = self.provider.send(prompt, &self.params).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(completion) => {
                record_llm_request(
                    self.provider.provider_name(),
                    self.provider.model(),
                    elapsed,
                    LlmOutcome::Success {
                        tokens: completion.tokens_used,
                    },
                );
                info!(
                    tokens_used = completion.tokens_used,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Completion received"
                );
                self.cache.put(prompt, completion).await;
            }
            Err(e) => {
                let outcome = match e {
                    DomainError::ProviderTimeout { .. } => LlmOutcome::Timeout,
                    _ => LlmOutcome::Error,
                };
                record_llm_request(
                    self.provider.provider_name(),
                    self.provider.model(),
                    elapsed,
                    outcome,
                );
                warn!(error = %e, "Completion request failed");
            }
        }

        result
    }
}
