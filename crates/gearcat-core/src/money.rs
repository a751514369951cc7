//! Currency codes and currency-tagged decimal amounts.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Decimal places on a customer-facing price.
pub const PRICE_DP: u32 = 2;

/// An ISO 4217 currency code, stored upper-case (e.g. `"USD"`, `"ZAR"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCurrency`] unless `code` is exactly three
    /// ASCII letters.
    pub fn new(code: &str) -> Result<Self, CoreError> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidCurrency(code.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn usd() -> Self {
        Self("USD".to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decimal amount in an explicit currency.
///
/// Addition is only defined between amounts of the same currency; moving
/// between currencies goes through [`Money::convert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    #[must_use]
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Adds two amounts of the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CurrencyMismatch`] if the currencies differ and
    /// [`CoreError::Overflow`] if the sum does not fit a `Decimal`.
    pub fn checked_add(&self, other: &Money) -> Result<Money, CoreError> {
        if self.currency != other.currency {
            return Err(CoreError::CurrencyMismatch {
                expected: self.currency.clone(),
                found: other.currency.clone(),
            });
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| CoreError::Overflow {
                context: format!("adding {self} and {other}"),
            })?;
        Ok(Money::new(amount, self.currency.clone()))
    }

    /// Re-expresses this amount in `target` using `rate` units of `target`
    /// per unit of `self.currency`. No rounding is applied.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Overflow`] if the product does not fit a `Decimal`.
    pub fn convert(&self, rate: Decimal, target: Currency) -> Result<Money, CoreError> {
        let amount = self
            .amount
            .checked_mul(rate)
            .ok_or_else(|| CoreError::Overflow {
                context: format!("converting {self} to {target} at {rate}"),
            })?;
        Ok(Money::new(amount, target))
    }

    /// Rounds half-up (midpoint away from zero) to [`PRICE_DP`] places.
    #[must_use]
    pub fn rounded(&self) -> Money {
        Money::new(
            self.amount
                .round_dp_with_strategy(PRICE_DP, RoundingStrategy::MidpointAwayFromZero),
            self.currency.clone(),
        )
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Parses a scraped listing price such as `"$1,299.00"` into [`Money`].
///
/// Whitespace, thousands separators and any leading currency symbol or code
/// are stripped before parsing.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPrice`] if nothing numeric remains, the
/// remainder is not a decimal, or the value is negative.
pub fn parse_listed_price(raw: &str, currency: Currency) -> Result<Money, CoreError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let numeric = cleaned.trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'));

    if numeric.is_empty() {
        return Err(CoreError::InvalidPrice {
            raw: raw.to_owned(),
            reason: "no numeric value".into(),
        });
    }

    let amount = Decimal::from_str(numeric).map_err(|e| CoreError::InvalidPrice {
        raw: raw.to_owned(),
        reason: e.to_string(),
    })?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::InvalidPrice {
            raw: raw.to_owned(),
            reason: "price must not be negative".into(),
        });
    }

    Ok(Money::new(amount, currency))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn zar() -> Currency {
        Currency::new("ZAR").unwrap()
    }

    #[test]
    fn currency_is_uppercased() {
        assert_eq!(Currency::new("zar").unwrap().as_str(), "ZAR");
    }

    #[test]
    fn currency_rejects_bad_codes() {
        for code in ["", "US", "USDT", "U$D", "12A"] {
            assert!(Currency::new(code).is_err(), "{code} should be rejected");
        }
    }

    #[test]
    fn currency_serializes_as_plain_string() {
        let json = serde_json::to_string(&Currency::usd()).unwrap();
        assert_eq!(json, "\"USD\"");
        let back: Currency = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(back.as_str(), "EUR");
    }

    #[test]
    fn checked_add_same_currency() {
        let a = Money::new(dec!(10.50), Currency::usd());
        let b = Money::new(dec!(2.25), Currency::usd());
        assert_eq!(a.checked_add(&b).unwrap().amount, dec!(12.75));
    }

    #[test]
    fn checked_add_rejects_mixed_currencies() {
        let a = Money::new(dec!(10), Currency::usd());
        let b = Money::new(dec!(10), zar());
        let err = a.checked_add(&b).unwrap_err();
        assert!(matches!(err, CoreError::CurrencyMismatch { .. }));
    }

    #[test]
    fn convert_multiplies_by_rate() {
        let usd = Money::new(dec!(100), Currency::usd());
        let converted = usd.convert(dec!(18.25), zar()).unwrap();
        assert_eq!(converted.amount, dec!(1825));
        assert_eq!(converted.currency, zar());
    }

    #[test]
    fn convert_reports_overflow_instead_of_panicking() {
        let huge = Money::new(Decimal::MAX, Currency::usd());
        let err = huge.convert(dec!(18.25), zar()).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { .. }));
    }

    #[test]
    fn checked_add_reports_overflow() {
        let a = Money::new(Decimal::MAX, Currency::usd());
        let b = Money::new(dec!(1), Currency::usd());
        let err = a.checked_add(&b).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { ref context } if context.contains("adding")));
    }

    #[test]
    fn rounded_uses_half_up() {
        let m = Money::new(dec!(2.345), Currency::usd());
        assert_eq!(m.rounded().amount, dec!(2.35));
        let m = Money::new(dec!(2.344), Currency::usd());
        assert_eq!(m.rounded().amount, dec!(2.34));
    }

    #[test]
    fn parse_listed_price_strips_symbol_and_separators() {
        let m = parse_listed_price("$1,299.99", Currency::usd()).unwrap();
        assert_eq!(m.amount, dec!(1299.99));
    }

    #[test]
    fn parse_listed_price_strips_currency_code_prefix() {
        let m = parse_listed_price("US$ 45", Currency::usd()).unwrap();
        assert_eq!(m.amount, dec!(45));
    }

    #[test]
    fn parse_listed_price_accepts_plain_number() {
        let m = parse_listed_price("12.5", Currency::usd()).unwrap();
        assert_eq!(m.amount, dec!(12.5));
    }

    #[test]
    fn parse_listed_price_rejects_empty() {
        let err = parse_listed_price("", Currency::usd()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrice { .. }));
    }

    #[test]
    fn parse_listed_price_rejects_symbol_only() {
        let err = parse_listed_price("$", Currency::usd()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrice { .. }));
    }

    #[test]
    fn parse_listed_price_rejects_trailing_garbage() {
        let err = parse_listed_price("$12.00 each", Currency::usd()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrice { ref raw, .. } if raw == "$12.00 each"));
    }

    #[test]
    fn parse_listed_price_rejects_negative() {
        let err = parse_listed_price("-5", Currency::usd()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrice { .. }));
    }
}
