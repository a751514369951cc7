//! Converts scraped product exports into catalog-import records with landed
//! prices.

pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use error::ImportError;
pub use normalize::{build_catalog_product, parse_price, parse_weight};
pub use pipeline::{convert_products, parse_export, ImportFailure, ImportReport};
pub use types::{Breadcrumb, ParseHubExport, ParseHubUrl, ScrapedImage, ScrapedProduct};
