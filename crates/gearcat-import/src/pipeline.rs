//! Batch conversion of a scraped export into catalog records.

use futures::stream::{self, StreamExt};
use gearcat_core::{CatalogProduct, CatalogRules, Currency};
use gearcat_pricing::{PriceCalculator, RateProvider};
use serde_json::Value;

use crate::error::ImportError;
use crate::normalize::{build_catalog_product, parse_price, parse_weight};
use crate::types::{ParseHubExport, ScrapedProduct};

/// A product that could not be converted, and why.
#[derive(Debug)]
pub struct ImportFailure {
    /// The product title, or `#<index>` when the listing has none.
    pub product: String,
    pub error: ImportError,
}

/// Outcome of converting a batch: converted records in input order plus
/// the listings that failed.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub products: Vec<CatalogProduct>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Renders `{"products": [...]}` with sorted keys and four-space indent.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Deserialize`] if a record cannot be encoded.
    pub fn to_document(&self) -> Result<String, ImportError> {
        let encode_err = |source| ImportError::Deserialize {
            context: "catalog import document".to_string(),
            source,
        };

        let products = serde_json::to_value(&self.products).map_err(encode_err)?;
        let mut document = serde_json::Map::new();
        document.insert("products".to_string(), products);
        let document = sort_keys(Value::Object(document));

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(&document, &mut ser).map_err(encode_err)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Parses a ParseHub run export.
///
/// # Errors
///
/// Returns [`ImportError::Deserialize`] when `json` is not a valid export.
pub fn parse_export(json: &str) -> Result<Vec<ScrapedProduct>, ImportError> {
    let export: ParseHubExport =
        serde_json::from_str(json).map_err(|source| ImportError::Deserialize {
            context: "ParseHub export".to_string(),
            source,
        })?;
    Ok(export.into_products())
}

/// Converts every listing, pricing up to `concurrency` of them at once.
///
/// Listed prices are read in the calculator's rate table currency and
/// landed in `target`. A listing that fails to parse or price is recorded in
/// [`ImportReport::failures`] and does not stop the batch.
pub async fn convert_products<P: RateProvider>(
    products: Vec<ScrapedProduct>,
    calculator: &PriceCalculator<P>,
    rules: &CatalogRules,
    target: &Currency,
    concurrency: usize,
) -> ImportReport {
    let base = calculator.table().currency().clone();
    let base = &base;

    let results: Vec<(String, Result<CatalogProduct, ImportError>)> =
        stream::iter(products.into_iter().enumerate())
            .map(|(index, product)| async move {
                let label = product_label(&product, index);
                let result = convert_one(product, calculator, rules, base, target).await;
                (label, result)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

    let mut report = ImportReport::default();
    for (label, result) in results {
        match result {
            Ok(product) => report.products.push(product),
            Err(error) => {
                tracing::warn!(product = %label, error = %error, "skipping product");
                report.failures.push(ImportFailure {
                    product: label,
                    error,
                });
            }
        }
    }
    report
}

async fn convert_one<P: RateProvider>(
    product: ScrapedProduct,
    calculator: &PriceCalculator<P>,
    rules: &CatalogRules,
    base: &Currency,
    target: &Currency,
) -> Result<CatalogProduct, ImportError> {
    let weight = parse_weight(&product)?;
    let price = match parse_price(&product, base)? {
        Some(listed) => Some(
            calculator
                .compute_price(&listed, weight.as_ref(), target)
                .await?,
        ),
        None => None,
    };
    Ok(build_catalog_product(product, price, weight, rules))
}

fn product_label(product: &ScrapedProduct, index: usize) -> String {
    product
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| format!("#{index}"), ToOwned::to_owned)
}
