use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ModelRequestError;
use crate::models::content::ContentBlock;
use crate::models::message::Message;
use crate::models::role::Role;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

impl Usage {
    pub fn new(input_tokens: Option<u32>, output_tokens: Option<u32>) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// Body of a messages request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    pub system: String,
}

/// A parsed model reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub role: Role,
    #[serde(default)]
    pub model: String,
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Transport to a hosted model
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send one request and return the parsed response. Never retries.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<ModelResponse, ModelRequestError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_parsing() {
        let response: ModelResponse = serde_json::from_value(json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-sonnet-20241022",
            "content": [
                {"type": "text", "text": "Reading it now."},
                {"type": "tool_use", "id": "t1", "name": "read_file", "input": {"file_path": "/tmp/x.txt"}}
            ],
            "stop_reason": "tool_use",
            "stop_sequence": null,
            "usage": {"input_tokens": 12, "output_tokens": 15}
        }))
        .unwrap();

        assert_eq!(response.id, "msg_123");
        assert_eq!(response.role, Role::Assistant);
        assert_eq!(response.content.len(), 2);
        assert_eq!(response.usage, Some(Usage::new(Some(12), Some(15))));
    }

    #[test]
    fn test_request_omits_empty_tools() {
        let request = CompletionRequest {
            model: "m".to_string(),
            messages: vec![Message::user().with_text("hi")],
            max_tokens: 10,
            tools: vec![],
            system: "sys".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tools").is_none());
        assert_eq!(value["system"], "sys");
        assert_eq!(value["max_tokens"], 10);
    }
}
