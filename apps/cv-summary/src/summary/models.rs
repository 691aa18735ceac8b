use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;

/// Body used when the event carries no `body` (or a `null` one).
pub const DEFAULT_BODY: &str = "{}";
/// Summary returned when the model answers without any text block.
pub const NO_SUMMARY: &str = "No summary generated";

/// HTTP-style result handed back to the Lambda runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded string: the summary or the error message.
    pub body: String,
}

impl SummaryResponse {
    pub fn new(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: Value::String(message.to_string()).to_string(),
        }
    }

    pub fn ok(summary: &str) -> Self {
        Self::new(200, summary)
    }
}

/// Raw `body` of the inbound event.
/// Absent or `null` falls back to [`DEFAULT_BODY`]; any non-string value cannot be decoded.
pub fn event_body(event: &Value) -> Result<&str, AppError> {
    match event.get("body") {
        None | Some(Value::Null) => Ok(DEFAULT_BODY),
        Some(Value::String(body)) => Ok(body),
        Some(_) => Err(AppError::InvalidJsonBody),
    }
}

/// `cv_text` of the decoded body, `""` when absent, not a string, or the body is not an object.
pub fn cv_text(body: &Value) -> &str {
    body.get("cv_text").and_then(Value::as_str).unwrap_or("")
}
