use thiserror::Error;

use crate::llm_client::LlmError;
use crate::summary::models::SummaryResponse;

/// Handler-level error type.
/// The `Display` text of each variant is exactly the message returned to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid JSON body")]
    InvalidJsonBody,

    #[error("No CV text provided")]
    MissingCvText,

    #[error("Error generating summary: {0}")]
    Summary(#[from] LlmError),
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidJsonBody | AppError::MissingCvText => 400,
            AppError::Summary(_) => 500,
        }
    }

    pub fn into_response(self) -> SummaryResponse {
        match &self {
            AppError::InvalidJsonBody => tracing::error!("Failed to parse body as JSON"),
            AppError::MissingCvText => tracing::warn!("No CV text provided in the request"),
            AppError::Summary(e) => tracing::error!("Error generating summary: {e:?}"),
        }

        SummaryResponse::new(self.status_code(), &self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        let response = AppError::InvalidJsonBody.into_response();
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, "\"Invalid JSON body\"");

        let response = AppError::MissingCvText.into_response();
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, "\"No CV text provided\"");
    }

    #[test]
    fn test_upstream_errors_collapse_to_500() {
        for err in [
            LlmError::Transport("connection reset".into()),
            LlmError::Service("ThrottlingException".into()),
            LlmError::MalformedResponse("eof".into()),
            LlmError::Unknown("?".into()),
        ] {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status_code, 500);
            assert!(response.body.starts_with("\"Error generating summary: "));
        }
    }
}
