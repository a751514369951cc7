use std::path::PathBuf;

use crate::money::Currency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Currency that listing prices and the shipping rate sheet are quoted in.
    pub base_currency: Currency,
    /// Store currency that catalog prices are converted into.
    pub target_currency: Currency,
    pub rate_source_url: String,
    pub rate_api_key: Option<String>,
    pub rate_request_timeout_secs: u64,
    pub rate_max_retries: u32,
    pub rate_retry_backoff_base_ms: u64,
    pub max_concurrent_products: usize,
    pub user_agent: String,
    pub rules_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("base_currency", &self.base_currency)
            .field("target_currency", &self.target_currency)
            .field("rate_source_url", &self.rate_source_url)
            .field(
                "rate_api_key",
                &self.rate_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("rate_request_timeout_secs", &self.rate_request_timeout_secs)
            .field("rate_max_retries", &self.rate_max_retries)
            .field(
                "rate_retry_backoff_base_ms",
                &self.rate_retry_backoff_base_ms,
            )
            .field("max_concurrent_products", &self.max_concurrent_products)
            .field("user_agent", &self.user_agent)
            .field("rules_path", &self.rules_path)
            .finish()
    }
}
