use async_trait::async_trait;
use std::fmt::Debug;

use super::{Completion, GenerationParams};
use crate::domain::DomainError;

/// A hosted completion backend (Gemini, OpenAI, Claude, Mistral, Groq).
///
/// Implementations send the prompt as a single user message under their own
/// wire envelope and normalize the answer into a [`Completion`].
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Send one completion request
    async fn send(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Completion, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Model identifier sent upstream
    fn model(&self) -> &str;
}
