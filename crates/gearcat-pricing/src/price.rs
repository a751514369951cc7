//! Landed price: listed price plus shipping, converted and rounded.

use std::sync::Arc;

use gearcat_core::{Currency, Money, Weight};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::converter::CurrencyConverter;
use crate::error::PricingError;
use crate::rates::RateProvider;
use crate::shipping::{billed_weight, RateTable};

/// Every intermediate amount behind a landed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub listed: Money,
    pub weight: Option<Weight>,
    pub billed_weight: Decimal,
    pub shipping: Money,
    pub total: Money,
    /// `total` in the target currency, rounded to two places.
    pub converted: Money,
}

pub struct PriceCalculator<P> {
    table: Arc<RateTable>,
    converter: CurrencyConverter<P>,
}

impl<P: RateProvider> PriceCalculator<P> {
    #[must_use]
    pub fn new(table: Arc<RateTable>, converter: CurrencyConverter<P>) -> Self {
        Self { table, converter }
    }

    #[must_use]
    pub fn table(&self) -> &RateTable {
        &self.table
    }

    #[must_use]
    pub fn converter(&self) -> &CurrencyConverter<P> {
        &self.converter
    }

    /// Prices one product and returns the full breakdown.
    ///
    /// An absent or zero weight ships for free. `listed` must be expressed
    /// in the rate table currency.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Core`] wrapping `CurrencyMismatch` when `listed` is
    ///   not in the table currency.
    /// - [`PricingError::RateUnavailable`] when conversion fails.
    /// - [`PricingError::Core`] wrapping `Overflow` when an amount does not
    ///   fit a `Decimal`.
    pub async fn quote(
        &self,
        listed: &Money,
        weight: Option<&Weight>,
        target: &Currency,
    ) -> Result<PriceQuote, PricingError> {
        let (billed, shipping) = match weight {
            Some(w) => (billed_weight(w)?, self.table.shipping_cost(w)?),
            None => (Decimal::ZERO, Money::zero(self.table.currency().clone())),
        };

        // Shipping is always in the table currency, so a foreign listing fails here.
        let total = shipping.checked_add(listed)?;
        let converted = self.converter.convert(&total, target).await?.rounded();

        tracing::debug!(
            listed = %listed,
            shipping = %shipping,
            converted = %converted,
            "priced product"
        );

        Ok(PriceQuote {
            listed: listed.clone(),
            weight: weight.copied(),
            billed_weight: billed,
            shipping,
            total,
            converted,
        })
    }

    /// The landed price of one product in `target`, rounded to two places.
    ///
    /// # Errors
    ///
    /// Same as [`Self::quote`].
    pub async fn compute_price(
        &self,
        listed: &Money,
        weight: Option<&Weight>,
        target: &Currency,
    ) -> Result<Money, PricingError> {
        Ok(self.quote(listed, weight, target).await?.converted)
    }
}

#[cfg(test)]
mod tests {
    use gearcat_core::{parse_listed_price, CoreError, WeightUnit};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::RateSourceError;
    use crate::rates::StaticRateProvider;

    fn zar() -> Currency {
        Currency::new("ZAR").unwrap()
    }

    fn calculator(rate: Decimal) -> PriceCalculator<StaticRateProvider> {
        let provider = StaticRateProvider::new().with_rate(Currency::usd(), zar(), rate);
        PriceCalculator::new(
            Arc::new(RateTable::fedex_usd()),
            CurrencyConverter::new(provider).with_retry(0, 0),
        )
    }

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::usd())
    }

    #[tokio::test]
    async fn quote_adds_shipping_then_converts() {
        let calc = calculator(dec!(18));
        let weight = Weight::from_kilograms(dec!(0.4));
        let quote = calc.quote(&usd(dec!(100)), Some(&weight), &zar()).await.unwrap();

        assert_eq!(quote.billed_weight, dec!(0.5));
        assert_eq!(quote.shipping.amount, dec!(31.88736));
        assert_eq!(quote.total.amount, dec!(131.88736));
        // 131.88736 * 18 = 2373.97248
        assert_eq!(quote.converted, Money::new(dec!(2373.97), zar()));
    }

    #[tokio::test]
    async fn missing_weight_ships_free() {
        let calc = calculator(dec!(2));
        let price = calc.compute_price(&usd(dec!(10)), None, &zar()).await.unwrap();
        assert_eq!(price, Money::new(dec!(20), zar()));
    }

    #[tokio::test]
    async fn zero_weight_ships_free() {
        let calc = calculator(dec!(2));
        let price = calc
            .compute_price(&usd(dec!(10)), Some(&Weight::ZERO), &zar())
            .await
            .unwrap();
        assert_eq!(price.amount, dec!(20));
    }

    #[tokio::test]
    async fn zero_listed_price_is_shipping_only() {
        let calc = calculator(dec!(1));
        let weight = Weight::from_kilograms(dec!(10.3));
        let price = calc
            .compute_price(&usd(Decimal::ZERO), Some(&weight), &zar())
            .await
            .unwrap();
        assert_eq!(price.amount, dec!(263.82));
    }

    #[tokio::test]
    async fn result_is_rounded_half_up() {
        let calc = calculator(dec!(0.5));
        // 0.01 * 0.5 = 0.005 → 0.01
        let price = calc.compute_price(&usd(dec!(0.01)), None, &zar()).await.unwrap();
        assert_eq!(price.amount, dec!(0.01));
    }

    #[tokio::test]
    async fn oversized_price_is_an_overflow_error() {
        let calc = calculator(dec!(18));
        let listed = parse_listed_price("$10,000,000,000,000,000,000,000,000,000", Currency::usd())
            .unwrap();
        let err = calc.compute_price(&listed, None, &zar()).await.unwrap_err();
        assert!(matches!(err, PricingError::Core(CoreError::Overflow { .. })));
    }

    #[tokio::test]
    async fn oversized_weight_is_an_overflow_error() {
        let calc = calculator(dec!(18));
        let weight = Weight::normalize("50000000000000000000000000000", WeightUnit::Kilogram).unwrap();
        let err = calc
            .compute_price(&usd(dec!(10)), Some(&weight), &zar())
            .await
            .unwrap_err();
        assert!(matches!(err, PricingError::Core(CoreError::Overflow { .. })));
    }

    #[tokio::test]
    async fn pound_weight_is_normalized_before_shipping() {
        let calc = calculator(dec!(1));
        let weight = Weight::normalize("22.05", WeightUnit::Pound).unwrap();
        let quote = calc.quote(&usd(Decimal::ZERO), Some(&weight), &zar()).await.unwrap();
        assert_eq!(quote.billed_weight, dec!(10.0));
        assert_eq!(quote.shipping.amount, dec!(257.92512));
    }

    #[tokio::test]
    async fn price_is_monotone_in_weight() {
        let calc = calculator(dec!(18.25));
        let listed = usd(dec!(49.99));
        let mut previous = Decimal::ZERO;
        let mut grams = 0u32;
        while grams <= 100_000 {
            let weight = Weight::from_kilograms(Decimal::from(grams) / dec!(1000));
            let price = calc
                .compute_price(&listed, Some(&weight), &zar())
                .await
                .unwrap()
                .amount;
            assert!(price >= previous, "price dropped at {grams} g");
            previous = price;
            grams += 250;
        }
    }

    #[tokio::test]
    async fn listed_price_in_other_currency_is_rejected() {
        let calc = calculator(dec!(18));
        let listed = Money::new(dec!(10), Currency::new("EUR").unwrap());
        let err = calc.compute_price(&listed, None, &zar()).await.unwrap_err();
        assert!(matches!(
            err,
            PricingError::Core(CoreError::CurrencyMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn unavailable_rate_is_not_swallowed() {
        let calc = PriceCalculator::new(
            Arc::new(RateTable::fedex_usd()),
            CurrencyConverter::new(StaticRateProvider::new()).with_retry(0, 0),
        );
        let err = calc
            .compute_price(&usd(dec!(10)), None, &zar())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PricingError::RateUnavailable {
                source: RateSourceError::MissingCurrency { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn same_target_currency_is_only_rounded() {
        let calc = calculator(dec!(18));
        let weight = Weight::from_kilograms(dec!(21.0));
        let price = calc
            .compute_price(&usd(dec!(0.004)), Some(&weight), &Currency::usd())
            .await
            .unwrap();
        assert_eq!(price, usd(dec!(388.18)));
    }
}
