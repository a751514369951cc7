use gearcat_core::CoreError;
use gearcat_pricing::PricingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The listing's weight or price could not be interpreted.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("JSON error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
