use tracing::Dispatch;

use crate::llm_client::LlmClient;

/// Shared handler state, built at cold start and cloned into every invocation.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Log sink for invocations. Handlers run under this dispatcher rather than
    /// whatever happens to be installed globally.
    pub dispatch: Dispatch,
}
