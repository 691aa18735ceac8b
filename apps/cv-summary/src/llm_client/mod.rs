/// LLM Client — the single point of entry for all Bedrock calls in this function.
///
/// No other module builds Bedrock payloads or decodes Bedrock responses.
/// The transport itself sits behind [`ModelInvoker`] so the handler can run
/// against a stub in tests.
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod bedrock;

/// Messages API version tag required by Bedrock for Anthropic models.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const DEFAULT_REGION: &str = "ap-southeast-2";
pub const MAX_TOKENS: u32 = 1000;
pub const TOP_K: u32 = 250;
pub const TOP_P: f64 = 0.999;
pub const STOP_SEQUENCES: &[&str] = &["\n\nHuman:"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("model service error: {0}")]
    Service(String),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("request encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

/// Sends a raw request body to the hosted model and returns the raw response body.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke_model(&self, body: Vec<u8>) -> Result<Vec<u8>, LlmError>;
}

#[derive(Debug, Serialize)]
pub struct BedrockRequest<'a> {
    pub messages: Vec<BedrockMessage<'a>>,
    pub anthropic_version: &'a str,
    pub system: &'a str,
    pub max_tokens: u32,
    pub top_k: u32,
    pub top_p: f64,
    pub stop_sequences: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct BedrockMessage<'a> {
    pub role: &'a str,
    pub content: Vec<MessageContent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct MessageContent<'a> {
    #[serde(rename = "type")]
    pub content_type: &'a str,
    pub text: &'a str,
}

impl<'a> BedrockRequest<'a> {
    /// Single-turn request with the fixed sampling parameters.
    pub fn new(prompt: &'a str, system: &'a str) -> Self {
        Self {
            messages: vec![BedrockMessage {
                role: "user",
                content: vec![MessageContent {
                    content_type: "text",
                    text: prompt,
                }],
            }],
            anthropic_version: ANTHROPIC_VERSION,
            system,
            max_tokens: MAX_TOKENS,
            top_k: TOP_K,
            top_p: TOP_P,
            stop_sequences: STOP_SEQUENCES,
        }
    }
}

/// Bedrock reply. Content items stay untyped: only the items up to and including
/// the first `text` item are inspected, the rest of the reply is never validated.
#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    #[serde(default)]
    pub content: Vec<Value>,
    /// Token accounting, logged only.
    pub usage: Option<Value>,
}

impl LlmResponse {
    /// Text of the first `text` item, `None` when the model produced no text item.
    ///
    /// An item without a `type` tag ahead of the first text item is malformed,
    /// as is a text item without a string `text`.
    pub fn text(&self) -> Result<Option<&str>, LlmError> {
        for (index, item) in self.content.iter().enumerate() {
            let block_type = item.get("type").ok_or_else(|| {
                LlmError::MalformedResponse(format!("content item {index} has no `type` field"))
            })?;
            if block_type.as_str() != Some("text") {
                continue;
            }
            return item
                .get("text")
                .and_then(Value::as_str)
                .map(Some)
                .ok_or_else(|| {
                    LlmError::MalformedResponse(
                        "text content block has no `text` field".to_string(),
                    )
                });
        }
        Ok(None)
    }
}

#[derive(Clone)]
pub struct LlmClient {
    invoker: Arc<dyn ModelInvoker>,
}

impl LlmClient {
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self { invoker }
    }

    /// Makes one call to the model. No retries.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = BedrockRequest::new(prompt, system);
        let payload = serde_json::to_vec(&request_body)?;
        debug!(
            "Constructed request body for Bedrock: {}",
            String::from_utf8_lossy(&payload)
        );

        let raw = self.invoker.invoke_model(payload).await?;
        let llm_response = decode_response(raw)?;

        if let Some(usage) = &llm_response.usage {
            debug!("LLM call succeeded: usage={usage}");
        }

        Ok(llm_response)
    }
}

fn decode_response(raw: Vec<u8>) -> Result<LlmResponse, LlmError> {
    let text = String::from_utf8(raw)
        .map_err(|e| LlmError::MalformedResponse(format!("response is not UTF-8: {e}")))?;
    debug!("Model response: {text}");
    serde_json::from_str(&text).map_err(|e| LlmError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_carries_fixed_parameters() {
        let value = serde_json::to_value(BedrockRequest::new("PROMPT", "SYSTEM")).unwrap();
        assert_eq!(value["max_tokens"], json!(1000));
        assert_eq!(value["top_k"], json!(250));
        assert_eq!(value["top_p"], json!(0.999));
        assert_eq!(value["stop_sequences"], json!(["\n\nHuman:"]));
        assert_eq!(value["anthropic_version"], json!("bedrock-2023-05-31"));
        assert_eq!(value["system"], json!("SYSTEM"));
        assert_eq!(
            value["messages"],
            json!([{"role": "user", "content": [{"type": "text", "text": "PROMPT"}]}])
        );
    }

    #[test]
    fn test_text_takes_first_text_block() {
        let response: LlmResponse = serde_json::from_value(json!({
            "content": [
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ]
        }))
        .unwrap();
        assert_eq!(response.text().unwrap(), Some("first"));
    }

    #[test]
    fn test_text_none_without_text_block() {
        let response: LlmResponse =
            serde_json::from_value(json!({"content": [{"type": "image"}]})).unwrap();
        assert_eq!(response.text().unwrap(), None);

        let empty: LlmResponse = serde_json::from_value(json!({"id": "msg_1"})).unwrap();
        assert_eq!(empty.text().unwrap(), None);
    }

    #[test]
    fn test_text_block_missing_text_is_malformed() {
        let response: LlmResponse =
            serde_json::from_value(json!({"content": [{"type": "text"}]})).unwrap();
        assert!(matches!(
            response.text(),
            Err(LlmError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_utf8_and_non_json() {
        assert!(matches!(
            decode_response(vec![0xff, 0xfe]),
            Err(LlmError::MalformedResponse(_))
        ));
        assert!(matches!(
            decode_response(b"not json".to_vec()),
            Err(LlmError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_untagged_item_before_text_is_malformed() {
        let response = decode_response(br#"{"content": [{"text": "x"}]}"#.to_vec()).unwrap();
        assert!(matches!(
            response.text(),
            Err(LlmError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_items_after_first_text_are_not_inspected() {
        let replies: [&[u8]; 3] = [
            br#"{"content": [{"type": "text", "text": "ok"}, {"text": "late"}]}"#,
            br#"{"content": [{"type": "text", "text": "ok"}, {"type": 7}]}"#,
            br#"{"content": [{"type": "text", "text": "ok"}], "usage": {"input_tokens": 5}}"#,
        ];
        for raw in replies {
            let response = decode_response(raw.to_vec()).unwrap();
            assert_eq!(response.text().unwrap(), Some("ok"));
        }
    }

    #[test]
    fn test_non_string_type_is_skipped() {
        let response = decode_response(
            br#"{"content": [{"type": 7}, {"type": "text", "text": "ok"}]}"#.to_vec(),
        )
        .unwrap();
        assert_eq!(response.text().unwrap(), Some("ok"));
    }

    struct EchoInvoker;

    #[async_trait]
    impl ModelInvoker for EchoInvoker {
        async fn invoke_model(&self, body: Vec<u8>) -> Result<Vec<u8>, LlmError> {
            let request: Value = serde_json::from_slice(&body).unwrap();
            let prompt = request["messages"][0]["content"][0]["text"].clone();
            Ok(serde_json::to_vec(&json!({
                "content": [{"type": "text", "text": prompt}],
                "usage": {"input_tokens": 12, "output_tokens": 3}
            }))
            .unwrap())
        }
    }

    #[tokio::test]
    async fn test_call_round_trips_through_invoker() {
        let client = LlmClient::new(Arc::new(EchoInvoker));
        let response = client.call("hello", "sys").await.unwrap();
        assert_eq!(response.text().unwrap(), Some("hello"));
        assert_eq!(response.usage.unwrap()["output_tokens"], json!(3));
    }
}
