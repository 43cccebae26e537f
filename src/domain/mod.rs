//! Domain layer - Core business logic and entities

pub mod cache;
pub mod conversation;
pub mod document;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod retrieval;

pub use cache::{Cache, CacheExt, CacheKeyGenerator, ContentHashKeyGenerator};
pub use conversation::{
    ConversationRepository, ConversationTurn, MessageRole, Session, SessionSummary,
};
pub use document::{documents_from_value, Document, ScoredDocument};
pub use error::DomainError;
pub use llm::{
    Completion, CompletionProvider, GenerationParams, LlmSettings, ProviderKind, DEFAULT_TIMEOUT,
};
pub use prompt::{build_prompt, format_documentation, format_history};
pub use retrieval::{find_relevant, similarity, DEFAULT_THRESHOLD, MAX_RESULTS};
