//! Product domain types used by the duplication workflow.

use std::collections::HashMap;

use bulk_duplicator_core::api::ProductSummary;
use serde::{Deserialize, Serialize};

// =============================================================================
// Source product (read once per run)
// =============================================================================

/// Snapshot of the product being copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceProduct {
    /// Product ID.
    pub id: String,
    /// Product title.
    pub title: String,
    /// HTML description.
    pub description_html: String,
    /// Vendor name.
    pub vendor: String,
    /// Product type/category.
    pub product_type: String,
    /// Product tags, in order.
    pub tags: Vec<String>,
    /// Option schema (e.g., Size, Color), in order.
    pub options: Vec<ProductOption>,
    /// Variants (up to 250), in order.
    pub variants: Vec<SourceVariant>,
    /// Image URLs extracted from media (up to 50), in order.
    pub image_urls: Vec<String>,
}

/// A product option and its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option ID.
    pub id: String,
    /// Option name (e.g., "Size").
    pub name: String,
    /// Option values, in order.
    pub values: Vec<String>,
}

/// A variant of the source product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceVariant {
    /// Variant ID.
    pub id: String,
    /// Price as a decimal string.
    pub price: String,
    /// Option name/value pairs identifying this variant.
    pub selected_options: Vec<SelectedOption>,
}

/// One option name/value pair of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

impl From<&SourceProduct> for ProductSummary {
    fn from(product: &SourceProduct) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            vendor: product.vendor.clone(),
            product_type: product.product_type.clone(),
            tags: product.tags.clone(),
            options: product.options.iter().map(|o| o.name.clone()).collect(),
            variant_count: product.variants.len(),
            image_urls: product.image_urls.clone(),
        }
    }
}

// =============================================================================
// Creation inputs
// =============================================================================

/// Everything needed to create one duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub title: String,
    pub description_html: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    /// Option schema cloned from the source.
    pub options: Vec<NewProductOption>,
    /// Image URLs attached at creation time.
    pub media_urls: Vec<String>,
}

/// An option to create along with the product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductOption {
    pub name: String,
    pub values: Vec<String>,
}

/// A variant to create on a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariant {
    /// Price as a decimal string.
    pub price: String,
    pub option_values: Vec<NewVariantOptionValue>,
}

/// An option value of a new variant, linked to the new product's option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariantOptionValue {
    /// Option ID on the new product. `None` when no option with a matching
    /// name exists; the API decides whether that is an error.
    pub option_id: Option<String>,
    /// Option value name (e.g., "Large").
    pub name: String,
}

/// A price change for an existing variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPriceUpdate {
    pub variant_id: String,
    pub price: String,
}

/// How `productVariantsBulkCreate` treats the product's standalone variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantCreateStrategy {
    /// Keep the standalone variant unless it is the default one.
    Default,
    /// Delete the standalone variant created with the product.
    RemoveStandaloneVariant,
    /// Keep the standalone variant.
    PreserveStandaloneVariant,
}

// =============================================================================
// Creation results
// =============================================================================

/// A freshly created product, as needed to wire its variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedProduct {
    /// Product ID.
    pub id: String,
    /// Option name to option ID.
    pub option_ids: HashMap<String, String>,
    /// ID of the variant Shopify created with the product.
    pub first_variant_id: Option<String>,
}

impl CreatedProduct {
    /// Look up an option ID by exact option name.
    #[must_use]
    pub fn option_id(&self, name: &str) -> Option<&str> {
        self.option_ids.get(name).map(String::as_str)
    }
}
