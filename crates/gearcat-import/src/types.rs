//! Input types for ParseHub product exports.
//!
//! ## Observed shape
//!
//! A run export nests products under the URLs they were scraped from:
//! `{"urls": [{"products": [...]}]}`. Every product field is optional; a
//! scrape template that fails to match a node simply omits the key.
//!
//! ### `weight`, `price`, `sku`, `barcode`
//! Usually strings (`"1.5"`, `"$1,299.00"`), but templates that extract with
//! a number selector emit JSON numbers. Both are accepted and kept as text;
//! interpretation happens during conversion.
//!
//! ### `unit`
//! Free text next to the weight (`"lb"`, `"lbs"`, `"kg"`). Absent means
//! kilograms.
//!
//! ### `breadcrumbs`
//! Ordered root to leaf, each wrapped as `{"breadcrumb": "..."}`. The first
//! entry is normally `"Home"`.

use serde::{Deserialize, Deserializer};

/// Top-level ParseHub run export.
#[derive(Debug, Default, Deserialize)]
pub struct ParseHubExport {
    #[serde(default)]
    pub urls: Vec<ParseHubUrl>,
}

impl ParseHubExport {
    /// All products across every scraped URL, in document order.
    #[must_use]
    pub fn into_products(self) -> Vec<ScrapedProduct> {
        self.urls.into_iter().flat_map(|url| url.products).collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ParseHubUrl {
    #[serde(default)]
    pub products: Vec<ScrapedProduct>,
}

/// One product as captured by the scraper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapedProduct {
    #[serde(default)]
    pub vendor: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Raw HTML description.
    #[serde(default)]
    pub body_html: Option<String>,

    #[serde(default)]
    pub breadcrumbs: Vec<Breadcrumb>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub sku: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub barcode: Option<String>,

    /// Numeric weight in `unit`. Empty string means "no weight".
    #[serde(default, deserialize_with = "lenient_text")]
    pub weight: Option<String>,

    #[serde(default)]
    pub unit: Option<String>,

    /// Listed price as displayed, e.g. `"$1,299.00"`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,

    #[serde(default)]
    pub images: Vec<ScrapedImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Breadcrumb {
    pub breadcrumb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScrapedImage {
    pub src: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

/// Accepts a string, a number, or `null`, yielding the value as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
    }))
}
