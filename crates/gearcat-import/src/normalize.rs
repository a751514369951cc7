//! Mapping from scraped listings to [`gearcat_core::CatalogProduct`].
//!
//! Weight and price interpretation lives in `gearcat-core`; this module
//! handles the structural conversion into the catalog-import shape.

use gearcat_core::{
    parse_listed_price, CatalogImage, CatalogOption, CatalogProduct, CatalogRules,
    CatalogVariant, CoreError, Currency, Money, Weight, WeightUnit,
};

use crate::types::{Breadcrumb, ScrapedImage, ScrapedProduct};

const DEFAULT_TITLE: &str = "Default Title";
const MASTER_DEALER_SERVICE: &str = "master_dealer";
const PLACEHOLDER_IMAGE_SIZE: u32 = 500;

/// Parses the listing's weight into kilograms.
///
/// A missing or blank weight yields `None`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidWeight`] for a non-numeric or negative value.
pub fn parse_weight(product: &ScrapedProduct) -> Result<Option<Weight>, CoreError> {
    let Some(raw) = product.weight.as_deref().filter(|w| !w.trim().is_empty()) else {
        return Ok(None);
    };
    let unit = product
        .unit
        .as_deref()
        .map_or(WeightUnit::Kilogram, WeightUnit::from_label);
    Weight::normalize(raw, unit).map(Some)
}

/// Parses the listing's displayed price in `currency`.
///
/// A missing price yields `None`; the product is imported unpriced.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPrice`] when a price is present but empty or
/// not a number.
pub fn parse_price(product: &ScrapedProduct, currency: &Currency) -> Result<Option<Money>, CoreError> {
    product
        .price
        .as_deref()
        .map(|raw| parse_listed_price(raw, currency.clone()))
        .transpose()
}

/// Builds the catalog record for one listing.
///
/// `price` is the landed price in the store currency and `weight` the
/// normalized weight; either may be absent.
#[must_use]
pub fn build_catalog_product(
    product: ScrapedProduct,
    price: Option<Money>,
    weight: Option<Weight>,
    rules: &CatalogRules,
) -> CatalogProduct {
    let product_type = product_type(&product.breadcrumbs);
    let tags = tags(&product.breadcrumbs, rules);
    let variant = build_variant(&product, price.as_ref(), weight.as_ref(), rules);

    let images = build_images(&product.images);
    let image = images.as_ref().and_then(|imgs| imgs.first().cloned());

    CatalogProduct {
        vendor: product.vendor,
        title: product.title,
        body_html: product.body_html,
        product_type,
        tags,
        published_scope: "global".to_string(),
        template_suffix: String::new(),
        variants: vec![variant],
        options: vec![default_option()],
        images,
        image,
    }
}

/// The category is the breadcrumb just above the product page.
fn product_type(breadcrumbs: &[Breadcrumb]) -> Option<String> {
    let index = breadcrumbs.len().checked_sub(2).unwrap_or_default();
    breadcrumbs.get(index).map(|b| b.breadcrumb.clone())
}

fn tags(breadcrumbs: &[Breadcrumb], rules: &CatalogRules) -> Option<String> {
    let tags: Vec<&str> = breadcrumbs
        .iter()
        .map(|b| b.breadcrumb.as_str())
        .filter(|label| !rules.is_excluded_breadcrumb(label))
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(", "))
    }
}

fn build_variant(
    product: &ScrapedProduct,
    price: Option<&Money>,
    weight: Option<&Weight>,
    rules: &CatalogRules,
) -> CatalogVariant {
    let has_barcode = product
        .barcode
        .as_deref()
        .is_some_and(|b| !b.trim().is_empty());
    let via_master_dealer =
        has_barcode && product.vendor.as_deref().is_some_and(|v| rules.is_master_dealer(v));

    CatalogVariant {
        title: DEFAULT_TITLE.to_string(),
        sku: product.sku.clone(),
        barcode: product.barcode.clone(),
        option1: DEFAULT_TITLE.to_string(),
        option2: None,
        option3: None,
        taxable: true,
        fulfillment_service: via_master_dealer.then(|| MASTER_DEALER_SERVICE.to_string()),
        inventory_management: "shopify".to_string(),
        grams: weight.map(Weight::grams),
        weight: weight.map(Weight::kilograms),
        weight_unit: weight.map(|_| "kg".to_string()),
        requires_shipping: true,
        inventory_quantity: 0,
        old_inventory_quantity: 0,
        inventory_policy: "continue".to_string(),
        price: price.map(|p| p.rounded().amount),
    }
}

fn default_option() -> CatalogOption {
    CatalogOption {
        name: "Title".to_string(),
        position: 1,
        values: vec![DEFAULT_TITLE.to_string()],
    }
}

fn build_images(images: &[ScrapedImage]) -> Option<Vec<CatalogImage>> {
    if images.is_empty() {
        return None;
    }
    Some(
        (1u32..)
            .zip(images)
            .map(|(position, image)| CatalogImage {
                position,
                width: PLACEHOLDER_IMAGE_SIZE,
                height: PLACEHOLDER_IMAGE_SIZE,
                src: image.src.clone(),
                variant_ids: Vec::new(),
            })
            .collect(),
    )
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
