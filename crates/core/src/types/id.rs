//! Canonical Shopify product identifiers.
//!
//! The Admin API only accepts fully-qualified global IDs
//! (`gid://shopify/Product/<numeric>`). Merchants paste all sorts of things
//! into a product picker: bare numeric IDs, admin URLs, or the global ID
//! itself. [`ProductGid::normalize`] turns any of those into the canonical
//! form, and a `ProductGid` value can only ever hold that form.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every canonical product global ID.
pub const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

const GID_SCHEME: &str = "gid://";

/// Errors raised while normalizing a product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// No identifier was supplied.
    #[error("sourceProductId is required")]
    Empty,

    /// The identifier could not be normalized into a product global ID.
    #[error("Invalid product ID: {0}")]
    Malformed(String),
}

/// A canonical Shopify product global ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductGid(String);

impl ProductGid {
    /// Normalize a user-supplied product identifier.
    ///
    /// Accepts:
    /// - a canonical ID (`gid://shopify/Product/123`), returned unchanged
    /// - a bare numeric ID (`123`)
    /// - anything whose last path segment is numeric
    ///   (`https://admin.shopify.com/store/acme/products/123`)
    ///
    /// Global IDs for other resource types are rejected rather than
    /// reinterpreted.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] for blank input and [`IdError::Malformed`]
    /// when the result does not match `gid://shopify/Product/<digits>`.
    pub fn normalize(raw: &str) -> Result<Self, IdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }

        let candidate = if trimmed.starts_with(GID_SCHEME) {
            trimmed.to_string()
        } else {
            let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
            let tail = without_query
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or(without_query);
            format!("{PRODUCT_GID_PREFIX}{tail}")
        };

        if is_canonical(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(IdError::Malformed(trimmed.to_string()))
        }
    }

    /// The full global ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric portion of the ID (`123` for `gid://shopify/Product/123`).
    #[must_use]
    pub fn numeric_id(&self) -> &str {
        self.0.strip_prefix(PRODUCT_GID_PREFIX).unwrap_or(&self.0)
    }
}

fn is_canonical(candidate: &str) -> bool {
    candidate
        .strip_prefix(PRODUCT_GID_PREFIX)
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

impl fmt::Display for ProductGid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductGid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProductGid {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl TryFrom<String> for ProductGid {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value)
    }
}

impl From<ProductGid> for String {
    fn from(id: ProductGid) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_numeric_id_is_prefixed() {
        let id = ProductGid::normalize("12345").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Product/12345");
        assert_eq!(id.numeric_id(), "12345");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = ProductGid::normalize("gid://shopify/Product/987").unwrap();
        let twice = ProductGid::normalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.as_str(), "gid://shopify/Product/987");
    }

    #[test]
    fn test_admin_url_is_normalized() {
        let id =
            ProductGid::normalize("https://admin.shopify.com/store/acme/products/42?tab=media")
                .unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Product/42");

        let id = ProductGid::normalize("Product/42/").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Product/42");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let id = ProductGid::normalize("  77 \n").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Product/77");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(ProductGid::normalize("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert_eq!(
            ProductGid::normalize("blue-shirt"),
            Err(IdError::Malformed("blue-shirt".to_string()))
        );
        assert!(ProductGid::normalize("gid://shopify/Product/").is_err());
        assert!(ProductGid::normalize("gid://shopify/Product/12a").is_err());
    }

    #[test]
    fn test_other_resource_gid_rejected() {
        assert!(ProductGid::normalize("gid://shopify/ProductVariant/5").is_err());
        assert!(ProductGid::normalize("gid://shopify/Collection/5").is_err());
    }

    #[test]
    fn test_serde_normalizes_on_deserialize() {
        let id: ProductGid = serde_json::from_str("\"555\"").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Product/555");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"gid://shopify/Product/555\""
        );
        assert!(serde_json::from_str::<ProductGid>("\"nope\"").is_err());
    }
}
