use std::sync::Arc;

use super::http_client::{HttpClient, HttpClientTrait};
use super::{AnthropicProvider, GeminiProvider, OpenAiCompatibleProvider};
use crate::domain::{CompletionProvider, DomainError, LlmSettings, ProviderKind};

/// Factory for creating completion providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the configured provider backed by a reqwest client
    pub fn create(settings: &LlmSettings) -> Result<Arc<dyn CompletionProvider>, DomainError> {
        let http_client = HttpClient::with_timeout(settings.timeout)?;
        Ok(Self::create_with_client(settings, http_client))
    }

    /// Create the configured provider on top of an arbitrary HTTP client
    pub fn create_with_client<C>(settings: &LlmSettings, client: C) -> Arc<dyn CompletionProvider>
    where
        C: HttpClientTrait + 'static,
    {
        let api_key = settings.api_key();
        let model = settings.model.clone();
        let base_url = settings.base_url.as_deref();

        match settings.provider {
            ProviderKind::Gemini => {
                let provider = GeminiProvider::new(client, api_key, model);
                Arc::new(match base_url {
                    Some(url) => provider.with_base_url(url),
                    None => provider,
                })
            }

            ProviderKind::Claude => {
                let provider = AnthropicProvider::new(client, api_key, model);
                Arc::new(match base_url {
                    Some(url) => provider.with_base_url(url),
                    None => provider,
                })
            }

            ProviderKind::OpenAi | ProviderKind::Mistral | ProviderKind::Groq => {
                let provider = match settings.provider {
                    ProviderKind::Mistral => OpenAiCompatibleProvider::mistral(client, api_key, model),
                    ProviderKind::Groq => OpenAiCompatibleProvider::groq(client, api_key, model),
                    _ => OpenAiCompatibleProvider::openai(client, api_key, model),
                };
                Arc::new(match base_url {
                    Some(url) => provider.with_base_url(url),
                    None => provider,
                })
            }
        }
    }
}
