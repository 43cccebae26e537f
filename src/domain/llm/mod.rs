//! LLM provider domain models and traits

mod completion;
mod provider;
mod settings;

pub use completion::{Completion, GenerationParams};
pub use provider::CompletionProvider;
pub use settings::{LlmSettings, ProviderKind, DEFAULT_TIMEOUT};

#[cfg(test)]
pub use provider::mock::MockProvider;
