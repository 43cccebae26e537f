use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use crate::domain::{
    Completion, CompletionProvider, DomainError, GenerationParams, ProviderKind,
};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Provider for any backend speaking the OpenAI chat-completions dialect
/// (OpenAI, Mistral, Groq)
#[derive(Debug)]
pub struct OpenAiCompatibleProvider<C: HttpClientTrait> {
    client: C,
    name: &'static str,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OpenAiCompatibleProvider<C> {
    pub fn openai(client: C, api_key: &str, model: impl Into<String>) -> Self {
        Self::new(client, ProviderKind::OpenAi, api_key, model)
    }

    pub fn mistral(client: C, api_key: &str, model: impl Into<String>) -> Self {
        Self::new(client, ProviderKind::Mistral, api_key, model)
    }

    pub fn groq(client: C, api_key: &str, model: impl Into<String>) -> Self {
        Self::new(client, ProviderKind::Groq, api_key, model)
    }

    fn new(client: C, kind: ProviderKind, api_key: &str, model: impl Into<String>) -> Self {
        Self {
            client,
            name: kind.display_name(),
            auth_header: format!("Bearer {}", api_key),
            base_url: default_base_url(kind).to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, prompt: &str, params: &GenerationParams) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Completion, DomainError> {
        let response: ChatCompletionResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(self.name, format!("Failed to parse response: {}", e))
        })?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| format!("No response from {}", self.name));

        let tokens = response
            .usage
            .and_then(|usage| usage.total_tokens)
            .unwrap_or(0);

        Ok(Completion::new(reply, tokens))
    }
}

fn default_base_url(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Mistral => DEFAULT_MISTRAL_BASE_URL,
        ProviderKind::Groq => DEFAULT_GROQ_BASE_URL,
        _ => DEFAULT_OPENAI_BASE_URL,
    }
}

#[async_trait]
impl<C: HttpClientTrait> CompletionProvider for OpenAiCompatibleProvider<C> {
    async fn send(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Completion, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(prompt, params);
        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|failure| failure.into_domain(self.name))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// OpenAI-compatible API types

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::http_client::HttpFailure;

    const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
    const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
    const MISTRAL_URL: &str = "https://api.mistral.ai/v1/chat/completions";

    fn params() -> GenerationParams {
        GenerationParams {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    #[tokio::test]
    async fn test_openai_send() {
        let client = MockHttpClient::new().with_response(
            OPENAI_URL,
            serde_json::json!({
                "id": "chatcmpl-123",
                "choices": [{
                    "message": { "role": "assistant", "content": "Refunds take 5 days." },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 30, "completion_tokens": 12, "total_tokens": 42 }
            }),
        );

        let provider = OpenAiCompatibleProvider::openai(client, "sk-test", "gpt-3.5-turbo");
        let completion = provider.send("How do refunds work?", &params()).await.unwrap();

        assert_eq!(completion.reply, "Refunds take 5 days.");
        assert_eq!(completion.tokens_used, 42);

        let request = provider.client.last_request().unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer sk-test"));
        assert_eq!(request.body["model"], "gpt-3.5-turbo");
        assert_eq!(request.body["messages"][0]["role"], "user");
        assert_eq!(request.body["messages"][0]["content"], "How do refunds work?");
        assert_eq!(request.body["max_tokens"], 1000);
        assert_eq!(request.body["temperature"], 0.7);
    }

    #[tokio::test]
    async fn test_missing_reply_and_usage() {
        let client = MockHttpClient::new().with_response(GROQ_URL, serde_json::json!({
            "choices": []
        }));

        let provider = OpenAiCompatibleProvider::groq(client, "gsk", "llama3-8b-8192");
        let completion = provider.send("hi", &params()).await.unwrap();

        assert_eq!(completion.reply, "No response from Groq");
        assert_eq!(completion.tokens_used, 0);
    }

    #[tokio::test]
    async fn test_upstream_error_message_surfaced() {
        let client = MockHttpClient::new().with_error(
            MISTRAL_URL,
            HttpFailure::Status {
                status: 401,
                body: r#"{"error":{"message":"Unauthorized"}}"#.to_string(),
            },
        );

        let provider = OpenAiCompatibleProvider::mistral(client, "bad", "mistral-small");
        let error = provider.send("hi", &params()).await.unwrap_err();

        assert_eq!(error.to_string(), "Mistral API error: Unauthorized");
        assert_eq!(error.upstream_status(), Some(401));
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let custom_url = "http://localhost:8080/v1/chat/completions";
        let client = MockHttpClient::new().with_response(custom_url, serde_json::json!({
            "choices": [{ "message": { "content": "Custom response" } }],
            "usage": { "total_tokens": 7 }
        }));

        let provider = OpenAiCompatibleProvider::openai(client, "k", "gpt-4o")
            .with_base_url("http://localhost:8080/v1/");
        let completion = provider.send("Test", &params()).await.unwrap();

        assert_eq!(completion.reply, "Custom response");
        assert_eq!(provider.model(), "gpt-4o");
        assert_eq!(provider.provider_name(), "OpenAI");
    }
}
