use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{provider} API error: {message}")]
    Provider {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("{provider} API error: request timed out after {timeout_secs}s")]
    ProviderTimeout { provider: String, timeout_secs: u64 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn provider_status(
        provider: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn provider_timeout(provider: impl Into<String>, timeout_secs: u64) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
            timeout_secs,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// True for upstream failures, timeouts included
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::ProviderTimeout { .. })
    }

    /// Upstream HTTP status, when the provider answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => *status,
            _ => None,
        }
    }
}
