use crate::app_config::{AppConfig, Environment};
use crate::money::Currency;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_currency = |var: &str, default: &str| -> Result<Currency, ConfigError> {
        let raw = or_default(var, default);
        Currency::new(&raw).map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("GEARCAT_ENV", "development"));
    let log_level = or_default("GEARCAT_LOG_LEVEL", "info");

    let base_currency = parse_currency("GEARCAT_BASE_CURRENCY", "USD")?;
    let target_currency = parse_currency("GEARCAT_TARGET_CURRENCY", "ZAR")?;

    let rate_source_url = or_default(
        "GEARCAT_RATE_SOURCE_URL",
        "https://api.frankfurter.app/latest",
    );
    let rate_api_key = lookup("GEARCAT_RATE_API_KEY")
        .ok()
        .filter(|k| !k.is_empty());
    let rate_request_timeout_secs = parse_u64("GEARCAT_RATE_REQUEST_TIMEOUT_SECS", "10")?;
    if rate_request_timeout_secs == 0 {
        return Err(invalid(
            "GEARCAT_RATE_REQUEST_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let rate_max_retries = parse_u32("GEARCAT_RATE_MAX_RETRIES", "1")?;
    let rate_retry_backoff_base_ms = parse_u64("GEARCAT_RATE_RETRY_BACKOFF_BASE_MS", "500")?;

    let max_concurrent_products = parse_usize("GEARCAT_MAX_CONCURRENT_PRODUCTS", "4")?;
    let user_agent = or_default("GEARCAT_USER_AGENT", "gearcat/0.1 (catalog-import)");
    let rules_path = lookup("GEARCAT_RULES_PATH")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        base_currency,
        target_currency,
        rate_source_url,
        rate_api_key,
        rate_request_timeout_secs,
        rate_max_retries,
        rate_retry_backoff_base_ms,
        max_concurrent_products,
        user_agent,
        rules_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
