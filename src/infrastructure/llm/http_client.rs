use async_trait::async_trait;
use std::time::Duration;

use crate::domain::DomainError;

/// Transport-level failure, mapped to a [`DomainError`] by the calling provider
#[derive(Debug, Clone, PartialEq)]
pub enum HttpFailure {
    /// Upstream answered with a non-success status
    Status { status: u16, body: String },
    /// No answer within the client timeout
    Timeout { after: Duration },
    /// Connection or protocol failure
    Transport(String),
    /// Success status but the body was not JSON
    Decode(String),
}

impl HttpFailure {
    /// Convert into the domain error for `provider`
    pub fn into_domain(self, provider: &str) -> DomainError {
        match self {
            Self::Status { status, body } => {
                DomainError::provider_status(provider, status, upstream_message(&body))
            }
            Self::Timeout { after } => DomainError::provider_timeout(provider, after.as_secs()),
            Self::Transport(message) => {
                DomainError::provider(provider, format!("Request failed: {}", message))
            }
            Self::Decode(message) => {
                DomainError::provider(provider, format!("Failed to parse response: {}", message))
            }
        }
    }
}

/// Extract `error.message` from an upstream error body
pub fn upstream_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpFailure>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, error: reqwest::Error) -> HttpFailure {
        if error.is_timeout() {
            HttpFailure::Timeout {
                after: self.timeout,
            }
        } else {
            HttpFailure::Transport(error.without_url().to_string())
        }
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpFailure> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(HttpFailure::Status { status, body });
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                HttpFailure::Decode(e.without_url().to_string())
            }
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_upstream_message_extracts_error_message() {
        let body = r#"{"error":{"message":"Invalid API key","type":"auth"}}"#;
        assert_eq!(upstream_message(body), "Invalid API key");
    }

    #[test]
    fn test_upstream_message_falls_back() {
        assert_eq!(upstream_message("<html>bad gateway</html>"), "Unknown error");
        assert_eq!(upstream_message(r#"{"error":"flat"}"#), "Unknown error");
    }

    #[test]
    fn test_failure_into_domain() {
        let error = HttpFailure::Status {
            status: 401,
            body: r#"{"error":{"message":"Invalid API key"}}"#.to_string(),
        }
        .into_domain("OpenAI");

        assert_eq!(error.to_string(), "OpenAI API error: Invalid API key");
        assert_eq!(error.upstream_status(), Some(401));

        let timeout = HttpFailure::Timeout {
            after: Duration::from_secs(30),
        }
        .into_domain("Gemini");
        assert!(matches!(timeout, DomainError::ProviderTimeout { timeout_secs: 30, .. }));
        assert!(timeout.is_provider_error());
    }

    #[tokio::test]
    async fn test_post_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        let url = format!("{}/v1/chat/completions", server.uri());
        let response = client
            .post_json(&url, vec![("Authorization", "Bearer k")], &serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(response["ok"], true);
    }

    #[tokio::test]
    async fn test_post_json_error_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"message": "Rate limit reached"}
            })))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        let failure = client
            .post_json(&server.uri(), vec![], &serde_json::json!({}))
            .await
            .unwrap_err();

        match failure {
            HttpFailure::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(upstream_message(&body), "Rate limit reached");
            }
            other => panic!("unexpected failure: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_json_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_millis(50)).unwrap();
        let failure = client
            .post_json(&server.uri(), vec![], &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(failure, HttpFailure::Timeout { .. }));
    }
}
