//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, CorsConfig, DatabaseConfig, DocumentsConfig, LlmConfig, LogFormat,
    LoggingConfig, RateLimitConfig, ServerConfig,
};
