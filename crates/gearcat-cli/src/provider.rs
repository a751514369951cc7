//! Rate provider selection and calculator construction for CLI runs.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use gearcat_core::{AppConfig, Currency};
use gearcat_pricing::{
    CachedRateProvider, CurrencyConverter, HttpRateProvider, PriceCalculator, RateProvider,
    RateSourceError, RateTable, StaticRateProvider,
};
use rust_decimal::Decimal;

/// The live rate source, or a fixed rate given on the command line.
pub(crate) enum CliRateProvider {
    Live(CachedRateProvider<HttpRateProvider>),
    Fixed(StaticRateProvider),
}

impl RateProvider for CliRateProvider {
    async fn rate(&self, from: &Currency, to: &Currency) -> Result<Decimal, RateSourceError> {
        match self {
            CliRateProvider::Live(p) => p.rate(from, to).await,
            CliRateProvider::Fixed(p) => p.rate(from, to).await,
        }
    }
}

/// Builds the provider for one run.
///
/// A `fixed_rate` is used for `base -> target` (and its reciprocal) without
/// touching the network.
pub(crate) fn build_provider(
    config: &AppConfig,
    target: &Currency,
    fixed_rate: Option<Decimal>,
) -> anyhow::Result<CliRateProvider> {
    if let Some(rate) = fixed_rate {
        if rate <= Decimal::ZERO {
            anyhow::bail!("--rate must be positive, got {rate}");
        }
        tracing::info!(from = %config.base_currency, to = %target, %rate, "using fixed conversion rate");
        return Ok(CliRateProvider::Fixed(StaticRateProvider::new().with_rate(
            config.base_currency.clone(),
            target.clone(),
            rate,
        )));
    }

    let http = HttpRateProvider::new(
        &config.rate_source_url,
        config.rate_request_timeout_secs,
        &config.user_agent,
    )
    .context("failed to build rate source client")?
    .with_api_key(config.rate_api_key.clone());

    Ok(CliRateProvider::Live(CachedRateProvider::new(http)))
}

/// Builds the price calculator over the built-in rate table.
///
/// # Errors
///
/// Fails when the configured base currency differs from the rate table's,
/// since listed prices would never add to shipping costs.
pub(crate) fn build_calculator(
    config: &AppConfig,
    provider: CliRateProvider,
) -> anyhow::Result<PriceCalculator<CliRateProvider>> {
    let table = RateTable::default();
    if table.currency() != &config.base_currency {
        anyhow::bail!(
            "GEARCAT_BASE_CURRENCY is {} but the shipping rate table is quoted in {}",
            config.base_currency,
            table.currency()
        );
    }

    let converter = CurrencyConverter::new(provider)
        .with_timeout(Duration::from_secs(config.rate_request_timeout_secs))
        .with_retry(config.rate_max_retries, config.rate_retry_backoff_base_ms);

    Ok(PriceCalculator::new(Arc::new(table), converter))
}
