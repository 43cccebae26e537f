use serde::{Deserialize, Serialize};

/// Normalized provider answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub reply: String,
    #[serde(rename = "tokensUsed")]
    pub tokens_used: u32,
}

impl Completion {
    pub fn new(reply: impl Into<String>, tokens_used: u32) -> Self {
        Self {
            reply: reply.into(),
            tokens_used,
        }
    }
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_serialization() {
        let completion = Completion::new("We refund within 30 days.", 12);
        let json = serde_json::to_string(&completion).unwrap();

        assert!(json.contains("\"reply\":\"We refund within 30 days.\""));
        assert!(json.contains("\"tokensUsed\":12"));
    }

    #[test]
    fn test_default_params() {
        let params = GenerationParams::default();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.max_tokens, 1000);
    }

    #[test]
    fn test_temperature_serializes_exactly() {
        let params = GenerationParams::default();
        let body = serde_json::json!({ "temperature": params.temperature });

        assert_eq!(body.to_string(), r#"{"temperature":0.7}"#);
    }
}
