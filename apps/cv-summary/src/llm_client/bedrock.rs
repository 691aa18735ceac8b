use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, SdkError};
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;

use super::{LlmError, ModelInvoker};

/// `InvokeModel` against Bedrock Runtime for a fixed model.
#[derive(Clone)]
pub struct BedrockInvoker {
    client: Client,
    model_id: String,
}

impl BedrockInvoker {
    pub fn new(client: Client, model_id: String) -> Self {
        Self { client, model_id }
    }

    /// Builds a client from the default AWS credential chain, pinned to `region`.
    pub async fn from_region(region: &str, model_id: String) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self::new(Client::new(&sdk_config), model_id)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    async fn invoke_model(&self, body: Vec<u8>) -> Result<Vec<u8>, LlmError> {
        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output.body.into_inner())
    }
}

fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> LlmError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::ServiceError(_) => LlmError::Service(message),
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) | SdkError::ResponseError(_) => {
            LlmError::Transport(message)
        }
        _ => LlmError::Unknown(message),
    }
}
