//! Completion provider implementations

mod anthropic;
mod factory;
mod gemini;
mod http_client;
mod openai;

pub use anthropic::AnthropicProvider;
pub use factory::LlmProviderFactory;
pub use gemini::GeminiProvider;
pub use http_client::{upstream_message, HttpClient, HttpClientTrait, HttpFailure};
pub use openai::OpenAiCompatibleProvider;

#[cfg(test)]
pub use http_client::mock::{MockHttpClient, RecordedRequest};
