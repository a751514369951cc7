//! `quote` command: price one listing and print every intermediate amount.

use gearcat_core::{parse_listed_price, AppConfig, Currency, Weight, WeightUnit};
use gearcat_pricing::PriceQuote;
use rust_decimal::Decimal;

use crate::provider::{build_calculator, build_provider};

pub(crate) struct QuoteArgs {
    pub price: String,
    pub weight: Option<String>,
    pub unit: Option<String>,
    pub target: Option<Currency>,
    pub rate: Option<Decimal>,
}

/// Prices one listing and prints the breakdown.
///
/// # Errors
///
/// Returns an error if the price or weight cannot be parsed, or if the
/// conversion rate is unavailable.
pub(crate) async fn run_quote(config: &AppConfig, args: QuoteArgs) -> anyhow::Result<()> {
    let target = args
        .target
        .unwrap_or_else(|| config.target_currency.clone());

    let listed = parse_listed_price(&args.price, config.base_currency.clone())?;
    let weight = args
        .weight
        .as_deref()
        .filter(|w| !w.trim().is_empty())
        .map(|w| {
            let unit = args
                .unit
                .as_deref()
                .map_or(WeightUnit::Kilogram, WeightUnit::from_label);
            Weight::normalize(w, unit)
        })
        .transpose()?;

    let provider = build_provider(config, &target, args.rate)?;
    let calculator = build_calculator(config, provider)?;

    let quote = calculator.quote(&listed, weight.as_ref(), &target).await?;
    print!("{}", render_quote(&quote));
    Ok(())
}

pub(crate) fn render_quote(quote: &PriceQuote) -> String {
    let weight = quote
        .weight
        .map_or_else(|| "none".to_string(), |w| format!("{} kg", w.kilograms()));
    format!(
        "listed:   {}\nweight:   {weight} (billed {} kg)\nshipping: {}\ntotal:    {}\nprice:    {}\n",
        quote.listed,
        quote.billed_weight,
        quote.shipping,
        quote.total,
        quote.converted,
    )
}

#[cfg(test)]
mod tests {
    use gearcat_core::Money;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn render_quote_lists_every_amount() {
        let zar = Currency::new("ZAR").unwrap();
        let quote = PriceQuote {
            listed: Money::new(dec!(100), Currency::usd()),
            weight: Some(Weight::from_kilograms(dec!(0.4))),
            billed_weight: dec!(0.5),
            shipping: Money::new(dec!(31.88736), Currency::usd()),
            total: Money::new(dec!(131.88736), Currency::usd()),
            converted: Money::new(dec!(2373.97), zar),
        };
        let text = render_quote(&quote);
        assert!(text.contains("weight:   0.4 kg (billed 0.5 kg)"));
        assert!(text.contains("2373.97"));
        assert!(text.contains("31.88736"));
    }

    #[test]
    fn render_quote_without_weight() {
        let quote = PriceQuote {
            listed: Money::new(dec!(10), Currency::usd()),
            weight: None,
            billed_weight: Decimal::ZERO,
            shipping: Money::zero(Currency::usd()),
            total: Money::new(dec!(10), Currency::usd()),
            converted: Money::new(dec!(10), Currency::usd()),
        };
        assert!(render_quote(&quote).contains("weight:   none"));
    }
}
