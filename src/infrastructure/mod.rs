//! Infrastructure layer - External service implementations

pub mod cache;
pub mod documents;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod rate_limit;
pub mod services;
pub mod storage;
