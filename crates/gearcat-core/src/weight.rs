//! Weight parsing and normalization to kilograms.
//!
//! Scraped listings report weight either in pounds or kilograms. Every
//! downstream calculation (shipping tiers, catalog `grams`) works in
//! kilograms, so [`Weight::normalize`] converts once at the boundary.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Pounds per kilogram, as used by the shipping rate sheet.
pub const POUNDS_PER_KILOGRAM: Decimal = dec!(2.205);

/// Decimal places kept on a normalized weight.
const WEIGHT_DP: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Pound,
    Kilogram,
}

impl WeightUnit {
    /// Interprets a scraped unit label.
    ///
    /// Pound spellings (`lb`, `lbs`, `pound`, `pounds`) map to
    /// [`WeightUnit::Pound`]; anything else, including an empty label, is
    /// treated as kilograms.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "lb" | "lbs" | "pound" | "pounds" => WeightUnit::Pound,
            _ => WeightUnit::Kilogram,
        }
    }
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightUnit::Pound => write!(f, "lb"),
            WeightUnit::Kilogram => write!(f, "kg"),
        }
    }
}

/// A non-negative mass in kilograms, rounded to three decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Weight {
    kilograms: Decimal,
}

impl Weight {
    pub const ZERO: Weight = Weight {
        kilograms: Decimal::ZERO,
    };

    /// Parses `raw` in the given `unit` and normalizes it to kilograms.
    ///
    /// Pounds are divided by [`POUNDS_PER_KILOGRAM`]; the result is rounded
    /// half-up to three decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWeight`] if `raw` is not a decimal number
    /// or is negative.
    pub fn normalize(raw: &str, unit: WeightUnit) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let value = Decimal::from_str(trimmed).map_err(|e| CoreError::InvalidWeight {
            raw: raw.to_owned(),
            reason: e.to_string(),
        })?;

        if value.is_sign_negative() && !value.is_zero() {
            return Err(CoreError::InvalidWeight {
                raw: raw.to_owned(),
                reason: "weight must not be negative".into(),
            });
        }

        let kilograms = match unit {
            WeightUnit::Pound => value / POUNDS_PER_KILOGRAM,
            WeightUnit::Kilogram => value,
        };

        Ok(Self::from_kilograms(kilograms))
    }

    /// Builds a weight from a kilogram amount, clamping negatives to zero.
    #[must_use]
    pub fn from_kilograms(kilograms: Decimal) -> Self {
        let rounded = kilograms
            .max(Decimal::ZERO)
            .round_dp_with_strategy(WEIGHT_DP, RoundingStrategy::MidpointAwayFromZero);
        Self {
            kilograms: rounded.normalize(),
        }
    }

    #[must_use]
    pub fn kilograms(&self) -> Decimal {
        self.kilograms
    }

    /// Whole grams, truncated toward zero. Saturates at `i64::MAX`.
    #[must_use]
    pub fn grams(&self) -> i64 {
        use rust_decimal::prelude::ToPrimitive;

        self.kilograms
            .checked_mul(dec!(1000))
            .and_then(|g| g.trunc().to_i64())
            .unwrap_or(i64::MAX)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.kilograms.is_zero()
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} kg", self.kilograms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_recognizes_pound_spellings() {
        for label in ["lb", "LB", " lbs ", "pound", "Pounds"] {
            assert_eq!(WeightUnit::from_label(label), WeightUnit::Pound, "{label}");
        }
    }

    #[test]
    fn from_label_defaults_to_kilogram() {
        for label in ["kg", "", "oz", "kilogram"] {
            assert_eq!(WeightUnit::from_label(label), WeightUnit::Kilogram, "{label}");
        }
    }

    #[test]
    fn normalize_kilograms_passes_through() {
        let w = Weight::normalize("4.4", WeightUnit::Kilogram).unwrap();
        assert_eq!(w.kilograms(), dec!(4.4));
    }

    #[test]
    fn normalize_pounds_divides_and_rounds() {
        // 10 / 2.205 = 4.53514...
        let w = Weight::normalize("10", WeightUnit::Pound).unwrap();
        assert_eq!(w.kilograms(), dec!(4.535));
    }

    #[test]
    fn normalize_pounds_matches_manual_division() {
        for raw in ["0", "0.5", "1", "2.2", "7.75", "13", "44.1", "155.3", "1000"] {
            let value = Decimal::from_str(raw).unwrap();
            let expected = (value / dec!(2.205))
                .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
            let w = Weight::normalize(raw, WeightUnit::Pound).unwrap();
            assert_eq!(w.kilograms(), expected.normalize(), "raw={raw}");
        }
    }

    #[test]
    fn normalize_kilograms_rounds_to_three_places() {
        let w = Weight::normalize("1.23456", WeightUnit::Kilogram).unwrap();
        assert_eq!(w.kilograms(), dec!(1.235));
    }

    #[test]
    fn normalize_trims_whitespace() {
        let w = Weight::normalize(" 2.5 ", WeightUnit::Kilogram).unwrap();
        assert_eq!(w.kilograms(), dec!(2.5));
    }

    #[test]
    fn normalize_zero_is_zero() {
        let w = Weight::normalize("0", WeightUnit::Pound).unwrap();
        assert!(w.is_zero());
    }

    #[test]
    fn normalize_rejects_non_numeric() {
        let err = Weight::normalize("heavy", WeightUnit::Kilogram).unwrap_err();
        assert!(matches!(err, CoreError::InvalidWeight { ref raw, .. } if raw == "heavy"));
    }

    #[test]
    fn normalize_rejects_negative() {
        let err = Weight::normalize("-1.5", WeightUnit::Pound).unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidWeight { ref reason, .. } if reason.contains("negative"))
        );
    }

    #[test]
    fn grams_truncates() {
        let w = Weight::from_kilograms(dec!(4.5359));
        assert_eq!(w.kilograms(), dec!(4.536));
        assert_eq!(w.grams(), 4536);
    }

    #[test]
    fn grams_saturates_on_huge_weight() {
        let w = Weight::normalize("50000000000000000000000000000", WeightUnit::Kilogram).unwrap();
        assert_eq!(w.grams(), i64::MAX);
    }

    #[test]
    fn from_kilograms_clamps_negative_to_zero() {
        assert!(Weight::from_kilograms(dec!(-3)).is_zero());
    }
}
