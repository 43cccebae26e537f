//! Chat request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ConversationTurn;
use crate::infrastructure::services::ChatReply;

/// `POST /api/chat` body.
///
/// Fields stay untyped so a wrong type gets the same 400 as a missing value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl ChatRequest {
    pub fn session_id(&self) -> &str {
        string_field(&self.session_id)
    }

    pub fn message(&self) -> &str {
        string_field(&self.message)
    }
}

/// Non-string values read as empty
pub(crate) fn string_field(value: &Option<Value>) -> &str {
    value.as_ref().and_then(Value::as_str).unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(flatten)]
    pub reply: ChatReply,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            success: true,
            reply,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub success: bool,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub messages: Vec<ConversationTurn>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_request_tolerates_wrong_types() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"sessionId": 42, "message": "hi"}"#).unwrap();
        assert_eq!(request.session_id(), "");
        assert_eq!(request.message(), "hi");

        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.message(), "");
    }

    #[test]
    fn test_response_is_flat() {
        let response = ChatResponse::from(ChatReply {
            reply: "Hello".to_string(),
            tokens_used: 7,
            timestamp: Utc::now(),
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["reply"], "Hello");
        assert_eq!(json["tokensUsed"], 7);
        assert!(json["timestamp"].is_string());
    }
}
