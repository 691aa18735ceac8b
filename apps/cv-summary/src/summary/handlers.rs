use serde_json::Value;
use tracing::instrument::WithSubscriber;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::state::AppState;
use crate::summary::models::{cv_text, event_body, SummaryResponse, NO_SUMMARY};
use crate::summary::prompts::{build_summary_prompt, CV_SUMMARY_SYSTEM};

/// Lambda entry point: one event in, one `{statusCode, body}` out.
/// Never fails; every error is mapped onto a response.
pub async fn handle_summary(state: &AppState, event: Value) -> SummaryResponse {
    async {
        match summarize(&state.llm, &event).await {
            Ok(summary) => SummaryResponse::ok(&summary),
            Err(err) => err.into_response(),
        }
    }
    .with_subscriber(state.dispatch.clone())
    .await
}

async fn summarize(llm: &LlmClient, event: &Value) -> Result<String, AppError> {
    debug!("Received event: {event}");

    let raw_body = event_body(event)?;
    debug!("Raw body content: {raw_body}");

    let parsed_body: Value = serde_json::from_str(raw_body).map_err(|e| {
        debug!("Body is not valid JSON: {e}");
        AppError::InvalidJsonBody
    })?;
    debug!("Parsed body content: {parsed_body}");

    let cv_text = cv_text(&parsed_body);
    if cv_text.is_empty() {
        return Err(AppError::MissingCvText);
    }
    info!(cv_chars = cv_text.chars().count(), "Extracted cv_text");

    let prompt = build_summary_prompt(cv_text);
    let response = llm.call(&prompt, CV_SUMMARY_SYSTEM).await?;

    let summary = response.text()?.unwrap_or(NO_SUMMARY).to_string();
    info!("Generated summary: '{summary}'");

    Ok(summary)
}
