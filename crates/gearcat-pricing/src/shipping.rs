//! Piecewise shipping rate table and the shipping cost lookup.
//!
//! Weights are billed in half-kilogram steps. The first tier enumerates the
//! cost of every billed weight explicitly; later tiers charge a base cost at
//! their threshold plus a fixed cost per step beyond it. The last tier is
//! open-ended: its linear rate applies to any weight past its threshold.
//!
//! All arithmetic is checked. A weight whose cost does not fit a `Decimal`
//! is an error for that one product.

use gearcat_core::{CoreError, Currency, Money, Weight};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::PricingError;

/// Granularity of billed weight, in kilograms.
pub const BILLING_STEP: Decimal = dec!(0.5);

/// How a tier prices the weight it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierPricing {
    /// Explicit cost for each [`BILLING_STEP`] from the tier threshold
    /// upward; entry `i` is the cost at `threshold + i * BILLING_STEP`.
    Schedule(Vec<Decimal>),
    /// `base_cost` at the threshold, plus `increment_cost` per
    /// [`BILLING_STEP`] beyond it.
    Linear {
        base_cost: Decimal,
        increment_cost: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTier {
    threshold: Decimal,
    pricing: TierPricing,
}

impl RateTier {
    #[must_use]
    pub fn schedule(threshold: Decimal, costs: Vec<Decimal>) -> Self {
        Self {
            threshold,
            pricing: TierPricing::Schedule(costs),
        }
    }

    #[must_use]
    pub fn linear(threshold: Decimal, base_cost: Decimal, increment_cost: Decimal) -> Self {
        Self {
            threshold,
            pricing: TierPricing::Linear {
                base_cost,
                increment_cost,
            },
        }
    }

    #[must_use]
    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    #[must_use]
    pub fn pricing(&self) -> &TierPricing {
        &self.pricing
    }

    /// Cost of `billed` kilograms, which must be at or above the threshold.
    /// `None` when the cost overflows.
    fn cost_at(&self, billed: Decimal) -> Option<Decimal> {
        let steps = billed
            .checked_sub(self.threshold)?
            .checked_div(BILLING_STEP)?;
        match &self.pricing {
            TierPricing::Schedule(costs) => {
                let index = steps.floor().to_usize().unwrap_or(0);
                // Validation guarantees the schedule reaches the next threshold.
                costs
                    .get(index)
                    .or_else(|| costs.last())
                    .copied()
                    .or(Some(Decimal::ZERO))
            }
            TierPricing::Linear {
                base_cost,
                increment_cost,
            } => steps.checked_mul(*increment_cost)?.checked_add(*base_cost),
        }
    }
}

/// An immutable, validated list of [`RateTier`]s covering `[0, ∞)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    currency: Currency,
    tiers: Vec<RateTier>,
}

impl RateTable {
    /// Builds a table from tiers ordered by ascending threshold.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidRateTable`] when the tiers leave a gap
    /// in `[0, ∞)`: no tier at zero, unordered thresholds, a schedule that
    /// stops short of the next threshold, or a schedule as the last tier. Also
    /// rejects negative costs.
    pub fn new(currency: Currency, tiers: Vec<RateTier>) -> Result<Self, PricingError> {
        let invalid = |msg: String| Err(PricingError::InvalidRateTable(msg));

        let Some(first) = tiers.first() else {
            return invalid("table has no tiers".into());
        };
        if !first.threshold.is_zero() {
            return invalid(format!(
                "first tier must start at 0, found {}",
                first.threshold
            ));
        }

        for (idx, tier) in tiers.iter().enumerate() {
            let next = tiers.get(idx + 1);
            if let Some(next) = next {
                if next.threshold <= tier.threshold {
                    return invalid(format!(
                        "thresholds must be strictly ascending ({} then {})",
                        tier.threshold, next.threshold
                    ));
                }
            }

            match &tier.pricing {
                TierPricing::Schedule(costs) => {
                    let Some(next) = next else {
                        return invalid(format!(
                            "last tier ({}) must be linear to cover all weights",
                            tier.threshold
                        ));
                    };
                    let span = next
                        .threshold
                        .checked_sub(tier.threshold)
                        .and_then(|gap| gap.checked_div(BILLING_STEP))
                        .unwrap_or(Decimal::MAX);
                    if span.fract() != Decimal::ZERO
                        || span.to_usize() != Some(costs.len())
                    {
                        return invalid(format!(
                            "schedule at {} has {} entries but {} are needed to reach {}",
                            tier.threshold,
                            costs.len(),
                            span,
                            next.threshold
                        ));
                    }
                    if costs.iter().any(Decimal::is_sign_negative) {
                        return invalid(format!(
                            "schedule at {} contains a negative cost",
                            tier.threshold
                        ));
                    }
                }
                TierPricing::Linear {
                    base_cost,
                    increment_cost,
                } => {
                    if base_cost.is_sign_negative() || increment_cost.is_sign_negative() {
                        return invalid(format!(
                            "tier at {} has a negative cost",
                            tier.threshold
                        ));
                    }
                }
            }
        }

        Ok(Self { currency, tiers })
    }

    /// The FedEx international rate sheet, in USD.
    #[must_use]
    pub fn fedex_usd() -> Self {
        Self {
            currency: Currency::usd(),
            tiers: vec![
                RateTier::schedule(
                    dec!(0.0),
                    vec![
                        dec!(0.0),
                        dec!(31.88736),
                        dec!(62.91456),
                        dec!(91.60704),
                        dec!(123.43296),
                        dec!(141.49632),
                        dec!(152.24832),
                        dec!(163.00032),
                        dec!(173.75232),
                        dec!(184.50432),
                        dec!(195.25632),
                        dec!(201.5232),
                        dec!(207.79008),
                        dec!(214.05696),
                        dec!(220.32384),
                        dec!(226.59072),
                        dec!(232.8576),
                        dec!(239.12448),
                        dec!(245.39136),
                        dec!(251.65824),
                    ],
                ),
                RateTier::linear(dec!(10.0), dec!(257.92512), dec!(5.89824)),
                RateTier::linear(dec!(21.0), dec!(388.17792), dec!(6.38976)),
                RateTier::linear(dec!(45.0), dec!(695.25504), dec!(6.7584)),
                RateTier::linear(dec!(70.5), dec!(1039.93344), dec!(14.7456)),
            ],
        }
    }

    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    #[must_use]
    pub fn tiers(&self) -> &[RateTier] {
        &self.tiers
    }

    /// The tier with the greatest threshold at or below `billed`.
    #[must_use]
    pub fn tier_for(&self, billed: Decimal) -> Option<&RateTier> {
        let idx = self.tiers.partition_point(|t| t.threshold <= billed);
        idx.checked_sub(1).and_then(|i| self.tiers.get(i))
    }

    /// Shipping cost for `weight` in the table currency.
    ///
    /// The weight is first rounded up to [`billed_weight`]; a zero weight
    /// always costs exactly zero.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Core`] wrapping `Overflow` when the billed
    /// weight or its cost does not fit a `Decimal`.
    pub fn shipping_cost(&self, weight: &Weight) -> Result<Money, PricingError> {
        let billed = billed_weight(weight)?;
        if billed.is_zero() {
            return Ok(Money::zero(self.currency.clone()));
        }

        let Some(tier) = self.tier_for(billed) else {
            return Ok(Money::zero(self.currency.clone()));
        };

        if self.tiers.last().is_some_and(|last| billed > last.threshold) {
            tracing::debug!(
                billed_kg = %billed,
                last_threshold = %tier.threshold,
                "billed weight past last rate tier; extrapolating its linear rate"
            );
        }

        let cost = tier
            .cost_at(billed)
            .ok_or_else(|| out_of_range(weight))?;
        Ok(Money::new(cost.normalize(), self.currency.clone()))
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::fedex_usd()
    }
}

/// Rounds `weight` up to the next [`BILLING_STEP`].
///
/// # Errors
///
/// Returns [`PricingError::Core`] wrapping `Overflow` for a weight too large
/// to count in steps.
pub fn billed_weight(weight: &Weight) -> Result<Decimal, PricingError> {
    weight
        .kilograms()
        .checked_div(BILLING_STEP)
        .and_then(|steps| steps.ceil().checked_mul(BILLING_STEP))
        .ok_or_else(|| out_of_range(weight))
}

fn out_of_range(weight: &Weight) -> PricingError {
    CoreError::Overflow {
        context: format!("pricing shipping for {weight}"),
    }
    .into()
}

#[cfg(test)]
#[path = "shipping_test.rs"]
mod tests;
