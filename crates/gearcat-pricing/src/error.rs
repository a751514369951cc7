use gearcat_core::{CoreError, Currency};
use thiserror::Error;

/// Errors returned by a [`crate::RateProvider`] while looking up a rate.
#[derive(Debug, Error)]
pub enum RateSourceError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate source has no rate for {from} -> {to}")]
    MissingCurrency { from: Currency, to: Currency },

    /// The rate is zero, negative, or not a number.
    #[error("rate source returned invalid rate {rate} for {from} -> {to}")]
    InvalidRate {
        from: Currency,
        to: Currency,
        rate: String,
    },

    #[error("rate lookup timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("invalid rate source URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum PricingError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No usable conversion rate could be obtained for the pair. A price is
    /// never emitted in the unconverted currency in its place.
    #[error("conversion rate {from} -> {to} unavailable: {source}")]
    RateUnavailable {
        from: Currency,
        to: Currency,
        #[source]
        source: RateSourceError,
    },

    #[error("invalid shipping rate table: {0}")]
    InvalidRateTable(String),
}
