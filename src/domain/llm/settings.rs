//! Resolved provider configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::GenerationParams;
use crate::domain::DomainError;

/// Default upstream timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Supported completion backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Claude,
    Mistral,
    Groq,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        Self::Gemini,
        Self::OpenAi,
        Self::Claude,
        Self::Mistral,
        Self::Groq,
    ];

    /// Configuration identifier
    pub fn id(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::Mistral => "mistral",
            Self::Groq => "groq",
        }
    }

    /// Name used in error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
            Self::Claude => "Claude",
            Self::Mistral => "Mistral",
            Self::Groq => "Groq",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-pro",
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Claude => "claude-3-sonnet-20240229",
            Self::Mistral => "mistral-small",
            Self::Groq => "llama3-8b-8192",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();

        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == normalized)
            .ok_or_else(|| {
                DomainError::configuration(format!("Unsupported LLM provider: {}", s.trim()))
            })
    }
}

/// Immutable provider settings, resolved once at startup
#[derive(Clone)]
pub struct LlmSettings {
    pub provider: ProviderKind,
    api_key: String,
    pub model: String,
    pub params: GenerationParams,
    pub timeout: Duration,
    /// Overrides the provider's public endpoint
    pub base_url: Option<String>,
}

impl LlmSettings {
    /// Validates raw configuration values.
    ///
    /// Fails with a configuration error for an unknown provider or a
    /// missing API key.
    pub fn resolve(
        provider: &str,
        api_key: Option<&str>,
        model: Option<&str>,
    ) -> Result<Self, DomainError> {
        let provider: ProviderKind = provider.parse()?;

        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DomainError::configuration("LLM API key is not set (APP__LLM__API_KEY)")
            })?;

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(provider.default_model());

        Ok(Self {
            provider,
            api_key: api_key.to_string(),
            model: model.to_string(),
            params: GenerationParams::default(),
            timeout: DEFAULT_TIMEOUT,
            base_url: None,
        })
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("params", &self.params)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}
