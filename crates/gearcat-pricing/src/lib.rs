//! Landed-price computation: shipping by weight, currency conversion, and
//! the price calculator that combines them.

pub mod converter;
pub mod error;
pub mod price;
pub mod rates;
mod retry;
pub mod shipping;

pub use converter::CurrencyConverter;
pub use error::{PricingError, RateSourceError};
pub use price::{PriceCalculator, PriceQuote};
pub use rates::{CachedRateProvider, HttpRateProvider, RateProvider, StaticRateProvider};
pub use shipping::{billed_weight, RateTable, RateTier, TierPricing, BILLING_STEP};
