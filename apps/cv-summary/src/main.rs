mod config;
mod errors;
mod llm_client;
mod state;
mod summary;

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{info, Dispatch};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::bedrock::BedrockInvoker;
use crate::llm_client::LlmClient;
use crate::state::AppState;
use crate::summary::handlers::handle_summary;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    // CloudWatch stamps each line itself; no ANSI, no timestamps.
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .without_time(),
        );
    let dispatch = Dispatch::new(subscriber);
    tracing::dispatcher::set_global_default(dispatch.clone())?;

    info!("Starting CV summary function v{}", env!("CARGO_PKG_VERSION"));

    let invoker = BedrockInvoker::from_region(&config.aws_region, config.model_id.clone()).await;
    info!(
        "Bedrock client initialized (model: {}, region: {})",
        invoker.model_id(),
        config.aws_region
    );

    let state = AppState {
        llm: LlmClient::new(Arc::new(invoker)),
        dispatch,
    };

    run(service_fn(move |event: LambdaEvent<Value>| {
        let state = state.clone();
        async move { Ok::<_, Error>(handle_summary(&state, event.payload).await) }
    }))
    .await
}
