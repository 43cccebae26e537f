use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use crate::domain::{Completion, CompletionProvider, DomainError, GenerationParams};

const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PROVIDER_NAME: &str = "Claude";

/// Anthropic Messages API provider
#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    // Temperature is not forwarded to this backend.
    fn build_request(&self, prompt: &str, params: &GenerationParams) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": params.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("content-type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Completion, DomainError> {
        let response: MessagesResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e))
        })?;

        let reply = response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| format!("No response from {}", PROVIDER_NAME));

        let tokens = response
            .usage
            .map(|usage| usage.input_tokens.unwrap_or(0) + usage.output_tokens.unwrap_or(0))
            .unwrap_or(0);

        Ok(Completion::new(reply, tokens))
    }
}

#[async_trait]
impl<C: HttpClientTrait> CompletionProvider for AnthropicProvider<C> {
    async fn send(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Completion, DomainError> {
        let url = self.messages_url();
        let body = self.build_request(prompt, params);
        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|failure| failure.into_domain(PROVIDER_NAME))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Anthropic API types

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::http_client::HttpFailure;

    const TEST_URL: &str = "https://api.anthropic.com/v1/messages";

    #[tokio::test]
    async fn test_anthropic_send() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({
                "id": "msg_123",
                "type": "message",
                "role": "assistant",
                "content": [{ "type": "text", "text": "Orders ship within 2 days." }],
                "usage": { "input_tokens": 40, "output_tokens": 9 }
            }),
        );

        let provider = AnthropicProvider::new(client, "sk-ant", "claude-3-sonnet-20240229");
        let completion = provider
            .send("When do orders ship?", &GenerationParams::default())
            .await
            .unwrap();

        assert_eq!(completion.reply, "Orders ship within 2 days.");
        assert_eq!(completion.tokens_used, 49);

        let request = provider.client.last_request().unwrap();
        assert_eq!(request.header("x-api-key"), Some("sk-ant"));
        assert_eq!(request.header("anthropic-version"), Some("2023-06-01"));
        assert_eq!(request.body["model"], "claude-3-sonnet-20240229");
        assert_eq!(request.body["max_tokens"], 1000);
        assert_eq!(request.body["messages"][0]["content"], "When do orders ship?");
        assert!(request.body.get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_anthropic_missing_content() {
        let client = MockHttpClient::new().with_response(TEST_URL, serde_json::json!({
            "content": []
        }));

        let provider = AnthropicProvider::new(client, "sk-ant", "claude-3-sonnet-20240229");
        let completion = provider.send("hi", &GenerationParams::default()).await.unwrap();

        assert_eq!(completion.reply, "No response from Claude");
        assert_eq!(completion.tokens_used, 0);
    }

    #[tokio::test]
    async fn test_anthropic_error_handling() {
        let client = MockHttpClient::new().with_error(
            TEST_URL,
            HttpFailure::Status {
                status: 529,
                body: r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#
                    .to_string(),
            },
        );

        let provider = AnthropicProvider::new(client, "sk-ant", "claude-3-sonnet-20240229");
        let error = provider.send("hi", &GenerationParams::default()).await.unwrap_err();

        assert_eq!(error.to_string(), "Claude API error: Overloaded");
        assert!(error.is_provider_error());
    }
}
