pub mod app_config;
pub mod catalog;
pub mod catalog_rules;
pub mod config;
pub mod money;
pub mod weight;

pub use app_config::{AppConfig, Environment};
pub use catalog::{CatalogImage, CatalogOption, CatalogProduct, CatalogVariant};
pub use catalog_rules::{load_catalog_rules, CatalogRules};
pub use config::{load_app_config, load_app_config_from_env};
pub use money::{parse_listed_price, Currency, Money};
pub use weight::{Weight, WeightUnit};

use thiserror::Error;

/// Errors raised while interpreting raw product values.
///
/// All variants are permanent: retrying with the same input yields the same
/// error.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid weight \"{raw}\": {reason}")]
    InvalidWeight { raw: String, reason: String },

    #[error("invalid price \"{raw}\": {reason}")]
    InvalidPrice { raw: String, reason: String },

    #[error("invalid currency code \"{0}\"")]
    InvalidCurrency(String),

    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    #[error("amount out of range while {context}")]
    Overflow { context: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("catalog rules validation failed: {0}")]
    Validation(String),
}
