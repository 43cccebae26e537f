use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DomainError, GenerationParams, LlmSettings};
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported by `/health`
    #[serde(default = "default_environment")]
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// SQLite persistence
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database file; `:memory:` keeps everything in process
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Completion provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub max_requests: u32,
    pub window_secs: u64,
}

/// Completion cache sizing
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_temperature() -> f64 {
    GenerationParams::default().temperature
}

fn default_max_tokens() -> u32 {
    GenerationParams::default().max_tokens
}

fn default_timeout_secs() -> u64 {
    crate::domain::DEFAULT_TIMEOUT.as_secs()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5002,
            environment: default_environment(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/support.db".to_string(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            api_key: None,
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            path: "docs/docs.json".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "https://ai-support-assistant-3vq6.onrender.com".to_string(),
                "https://ai-support-assistant-l9twunets-soubhagya2s-projects.vercel.app"
                    .to_string(),
            ],
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_secs: 15 * 60,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            max_capacity: 10_000,
        }
    }
}

impl LlmConfig {
    /// Validate into immutable provider settings
    pub fn resolve(&self) -> Result<LlmSettings, DomainError> {
        let mut settings = LlmSettings::resolve(
            &self.provider,
            self.api_key.as_deref(),
            self.model.as_deref(),
        )?
        .with_params(GenerationParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
        .with_timeout(Duration::from_secs(self.timeout_secs));

        if let Some(base_url) = self.base_url.as_deref().filter(|url| !url.trim().is_empty()) {
            settings = settings.with_base_url(base_url);
        }

        Ok(settings)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 5002);
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cors.allowed_origins.len(), 4);
    }

    #[test]
    fn test_llm_resolve_without_key_fails() {
        let err = LlmConfig::default().resolve().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_llm_resolve_carries_params() {
        let config = LlmConfig {
            provider: "Groq".to_string(),
            api_key: Some("gsk".to_string()),
            temperature: 0.2,
            max_tokens: 256,
            timeout_secs: 5,
            base_url: Some("http://localhost:9000/v1".to_string()),
            ..LlmConfig::default()
        };

        let settings = config.resolve().unwrap();

        assert_eq!(settings.model, "llama3-8b-8192");
        assert_eq!(settings.params.max_tokens, 256);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.base_url.as_deref(), Some("http://localhost:9000/v1"));
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "host": "127.0.0.1", "port": 9000 },
            "llm": { "provider": "claude", "api_key": "sk-ant" }
        }))
        .unwrap();

        assert_eq!(config.server.environment, "development");
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.documents.path, "docs/docs.json");
    }
}
