//! Per-copy override sets.
//!
//! A [`DuplicateSpec`] describes one requested copy of a source product.
//! Every field is optional; an absent (or blank) field inherits the source
//! product's value. The only exception is `tags`: when present it replaces
//! the source tags wholesale, even with an empty list.

use serde::{Deserialize, Serialize};

use crate::types::{Price, PriceError, TagsInput};

/// Shopify accepts at most this many media attachments per `productCreate`.
pub const MAX_MEDIA_PER_PRODUCT: usize = 50;

/// One requested duplicate and its field overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSpec {
    /// Replacement title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement media, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    /// Replacement HTML description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    /// Replacement vendor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Replacement product type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// Replacement tags (replaces, never merges).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsInput>,
    /// Initial price for the first variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl DuplicateSpec {
    /// Title override, if present and non-blank.
    #[must_use]
    pub fn title_override(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// Description override, if present and non-blank.
    #[must_use]
    pub fn description_override(&self) -> Option<&str> {
        non_blank(self.description_html.as_deref())
    }

    /// Vendor override, if present and non-blank.
    #[must_use]
    pub fn vendor_override(&self) -> Option<&str> {
        non_blank(self.vendor.as_deref())
    }

    /// Product type override, if present and non-blank.
    #[must_use]
    pub fn product_type_override(&self) -> Option<&str> {
        non_blank(self.product_type.as_deref())
    }

    /// Normalized replacement tags, if tags were supplied at all.
    #[must_use]
    pub fn tags_override(&self) -> Option<Vec<String>> {
        self.tags.as_ref().map(TagsInput::normalized)
    }

    /// Parsed price override, if present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the override is not a valid price.
    pub fn price_override(&self) -> Result<Option<Price>, PriceError> {
        non_blank(self.price.as_deref()).map(Price::parse).transpose()
    }

    /// Media to attach to this duplicate.
    ///
    /// Uses the override list when it has at least one non-blank URL,
    /// otherwise `base`. Order is preserved and the result is capped at
    /// [`MAX_MEDIA_PER_PRODUCT`].
    #[must_use]
    pub fn resolve_media_urls(&self, base: &[String]) -> Vec<String> {
        let overrides: Vec<String> = self
            .image_urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(String::from)
            .collect();

        let chosen = if overrides.is_empty() {
            base.to_vec()
        } else {
            overrides
        };

        chosen.into_iter().take(MAX_MEDIA_PER_PRODUCT).collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
