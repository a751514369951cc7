use std::time::Duration;

use gearcat_core::{Currency, Money};
use rust_decimal::Decimal;

use crate::error::{PricingError, RateSourceError};
use crate::rates::RateProvider;
use crate::retry::retry_with_backoff;

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Converts [`Money`] between currencies using an injected [`RateProvider`].
///
/// Each provider call is bounded by `attempt_timeout`; transient failures are
/// retried up to `max_retries` times with jittered exponential back-off.
pub struct CurrencyConverter<P> {
    provider: P,
    attempt_timeout: Duration,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl<P: RateProvider> CurrencyConverter<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Looks up the `from` → `to` rate.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::RateUnavailable`] when the provider fails after
    /// all retries, times out, or yields a non-positive rate.
    pub async fn rate(&self, from: &Currency, to: &Currency) -> Result<Decimal, PricingError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        let timeout_ms = u64::try_from(self.attempt_timeout.as_millis()).unwrap_or(u64::MAX);

        let result = retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
            match tokio::time::timeout(self.attempt_timeout, self.provider.rate(from, to)).await {
                Ok(rate) => rate,
                Err(_elapsed) => Err(RateSourceError::Timeout { timeout_ms }),
            }
        })
        .await
        .and_then(|rate| {
            if rate > Decimal::ZERO {
                Ok(rate)
            } else {
                Err(RateSourceError::InvalidRate {
                    from: from.clone(),
                    to: to.clone(),
                    rate: rate.to_string(),
                })
            }
        });

        result.map_err(|source| PricingError::RateUnavailable {
            from: from.clone(),
            to: to.clone(),
            source,
        })
    }

    /// Converts `amount` into `target`. The result is not rounded.
    ///
    /// # Errors
    ///
    /// Propagates [`PricingError::RateUnavailable`] from [`Self::rate`]; the
    /// unconverted amount is never returned in its place. A product too large
    /// for a `Decimal` is a [`PricingError::Core`] overflow.
    pub async fn convert(&self, amount: &Money, target: &Currency) -> Result<Money, PricingError> {
        let rate = self.rate(&amount.currency, target).await?;
        Ok(amount.convert(rate, target.clone())?)
    }
}
