//! Conversion rate sources.
//!
//! The price calculator only needs "how many units of `to` per unit of
//! `from`". [`RateProvider`] is that seam; [`HttpRateProvider`] queries a
//! fixer-compatible endpoint, [`CachedRateProvider`] memoizes another provider
//! for the length of a batch, and [`StaticRateProvider`] serves fixed rates
//! for tests and offline runs.

mod cache;
mod http;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use gearcat_core::Currency;
use rust_decimal::Decimal;

use crate::error::RateSourceError;

pub use cache::CachedRateProvider;
pub use http::HttpRateProvider;

/// A source of currency conversion rates.
pub trait RateProvider: Send + Sync {
    /// Units of `to` per one unit of `from`.
    ///
    /// Implementations should never return a non-positive rate; the
    /// converter rejects one regardless.
    fn rate(
        &self,
        from: &Currency,
        to: &Currency,
    ) -> impl Future<Output = Result<Decimal, RateSourceError>> + Send;
}

impl<P: RateProvider> RateProvider for Arc<P> {
    fn rate(
        &self,
        from: &Currency,
        to: &Currency,
    ) -> impl Future<Output = Result<Decimal, RateSourceError>> + Send {
        (**self).rate(from, to)
    }
}

/// Serves rates from a fixed in-memory map.
///
/// A pair that is missing but whose reverse is present is answered with the
/// reciprocal of the reverse rate.
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    rates: HashMap<(Currency, Currency), Decimal>,
}

impl StaticRateProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rate(mut self, from: Currency, to: Currency, rate: Decimal) -> Self {
        self.rates.insert((from, to), rate);
        self
    }

    fn lookup(&self, from: &Currency, to: &Currency) -> Result<Decimal, RateSourceError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        let direct = self.rates.get(&(from.clone(), to.clone())).copied();
        let inverse = || {
            self.rates
                .get(&(to.clone(), from.clone()))
                .filter(|r| **r > Decimal::ZERO)
                .and_then(|r| Decimal::ONE.checked_div(*r))
        };

        let rate = direct
            .or_else(inverse)
            .ok_or_else(|| RateSourceError::MissingCurrency {
                from: from.clone(),
                to: to.clone(),
            })?;

        if rate <= Decimal::ZERO {
            return Err(RateSourceError::InvalidRate {
                from: from.clone(),
                to: to.clone(),
                rate: rate.to_string(),
            });
        }
        Ok(rate)
    }
}

impl RateProvider for StaticRateProvider {
    async fn rate(&self, from: &Currency, to: &Currency) -> Result<Decimal, RateSourceError> {
        self.lookup(from, to)
    }
}
