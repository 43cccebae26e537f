use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use crate::domain::{Completion, CompletionProvider, DomainError, GenerationParams};

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const PROVIDER_NAME: &str = "Gemini";

/// Google Gemini `generateContent` provider
#[derive(Debug)]
pub struct GeminiProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> GeminiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    // The key travels as a query parameter; never log this URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(&self, prompt: &str, params: &GenerationParams) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": params.temperature,
                "maxOutputTokens": params.max_tokens,
            },
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Completion, DomainError> {
        let response: GenerateContentResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e))
        })?;

        let reply = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| format!("No response from {}", PROVIDER_NAME));

        let tokens = response
            .usage_metadata
            .and_then(|usage| usage.total_token_count)
            .unwrap_or(0);

        Ok(Completion::new(reply, tokens))
    }
}

#[async_trait]
impl<C: HttpClientTrait> CompletionProvider for GeminiProvider<C> {
    async fn send(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Completion, DomainError> {
        let body = self.build_request(prompt, params);
        let response = self
            .client
            .post_json(
                &self.generate_url(),
                vec![("Content-Type", "application/json")],
                &body,
            )
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

// Gemini API types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}
