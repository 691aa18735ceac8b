use anyhow::Result;

use crate::llm_client::{DEFAULT_MODEL_ID, DEFAULT_REGION};

/// Function configuration loaded once per cold start.
/// Every variable is optional; the defaults target the production model.
#[derive(Debug, Clone)]
pub struct Config {
    pub aws_region: String,
    pub model_id: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Self::from_vars(|key| std::env::var(key).ok()))
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Config {
            aws_region: var("BEDROCK_REGION", DEFAULT_REGION),
            model_id: var("BEDROCK_MODEL_ID", DEFAULT_MODEL_ID),
            rust_log: var("RUST_LOG", "info"),
        }
    }
}
