use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product in the commerce platform's catalog-import shape.
///
/// Built from a scraped listing by the import layer; serialized as-is into
/// the `{"products": [...]}` import document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Raw HTML description, copied verbatim from the listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    /// Category taken from the listing's breadcrumb trail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// Comma-separated tag string, e.g. `"Cameras, Monitors"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    pub published_scope: String,
    pub template_suffix: String,
    pub variants: Vec<CatalogVariant>,
    pub options: Vec<CatalogOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<CatalogImage>>,
    /// Primary image; always the first entry of `images`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<CatalogImage>,
}

impl CatalogProduct {
    /// Returns the single default variant every imported product carries.
    #[must_use]
    pub fn default_variant(&self) -> Option<&CatalogVariant> {
        self.variants.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogVariant {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub option1: String,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub taxable: bool,
    /// `"master_dealer"` for vendors fulfilled through the master dealer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment_service: Option<String>,
    pub inventory_management: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grams: Option<i64>,
    /// Weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<String>,
    pub requires_shipping: bool,
    pub inventory_quantity: i64,
    pub old_inventory_quantity: i64,
    pub inventory_policy: String,
    /// Landed retail price in the store currency, two decimal places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogOption {
    pub name: String,
    pub position: u32,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogImage {
    /// 1-based position in the gallery.
    pub position: u32,
    pub width: u32,
    pub height: u32,
    pub src: String,
    pub variant_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn make_variant() -> CatalogVariant {
        CatalogVariant {
            title: "Default Title".to_string(),
            sku: Some("SHD-702".to_string()),
            barcode: None,
            option1: "Default Title".to_string(),
            option2: None,
            option3: None,
            taxable: true,
            fulfillment_service: None,
            inventory_management: "shopify".to_string(),
            grams: Some(680),
            weight: Some(dec!(0.68)),
            weight_unit: Some("kg".to_string()),
            requires_shipping: true,
            inventory_quantity: 0,
            old_inventory_quantity: 0,
            inventory_policy: "continue".to_string(),
            price: Some(dec!(21450.17)),
        }
    }

    fn make_product(variants: Vec<CatalogVariant>) -> CatalogProduct {
        CatalogProduct {
            vendor: Some("SmallHD".to_string()),
            title: Some("SmallHD 702 Bright".to_string()),
            body_html: None,
            product_type: Some("Monitors".to_string()),
            tags: Some("Monitors, On-Camera".to_string()),
            published_scope: "global".to_string(),
            template_suffix: String::new(),
            variants,
            options: vec![],
            images: None,
            image: None,
        }
    }

    #[test]
    fn default_variant_is_first() {
        let product = make_product(vec![make_variant()]);
        assert_eq!(
            product.default_variant().and_then(|v| v.sku.as_deref()),
            Some("SHD-702")
        );
    }

    #[test]
    fn default_variant_none_when_empty() {
        assert!(make_product(vec![]).default_variant().is_none());
    }

    #[test]
    fn serialization_omits_absent_optionals() {
        let json = serde_json::to_value(make_product(vec![make_variant()])).unwrap();
        assert!(json.get("body_html").is_none());
        assert!(json.get("images").is_none());
        let variant = &json["variants"][0];
        assert!(variant.get("barcode").is_none());
        assert!(variant.get("fulfillment_service").is_none());
        // option2/option3 are always present, null when unused.
        assert!(variant["option2"].is_null());
        assert_eq!(variant["price"], "21450.17");
        assert_eq!(variant["grams"], 680);
    }
}
