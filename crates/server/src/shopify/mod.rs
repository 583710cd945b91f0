//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This module holds the Shopify Admin API access token.** The token can
//! create products and write variants; keep the server on private
//! infrastructure.
//!
//! # Architecture
//!
//! - `graphql_client::GraphQLQuery` as the operation seam
//! - Direct API calls to Shopify (no local database sync)
//! - [`AdminApi`] abstracts the calls the duplication services make, so the
//!   services take the client as an injected capability
//!
//! # Example
//!
//! ```rust,ignore
//! use bulk_duplicator_server::shopify::{AdminApi, AdminClient};
//!
//! let client = AdminClient::new(&config.shopify)?;
//! let source = client.get_source_product(&product_id).await?;
//! ```

mod admin;
pub mod types;

use std::future::Future;

use bulk_duplicator_core::{FileDescriptor, ProductGid, StagedUploadTarget};
use thiserror::Error;

pub use admin::AdminClient;
pub use types::*;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No access token is loaded, so there is no session to call with.
    #[error("No Shopify session - an Admin API access token is required")]
    NoAccessToken,

    /// Business errors from a mutation's `userErrors`.
    #[error("User errors: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The Admin API calls the upload stager and duplication orchestrator make.
///
/// Implemented by [`AdminClient`]; tests substitute an in-memory fake.
pub trait AdminApi: Send + Sync {
    /// Request one staged upload target per file, in input order.
    ///
    /// Remote `userErrors` surface as [`AdminShopifyError::UserErrors`].
    fn create_staged_uploads(
        &self,
        files: &[FileDescriptor],
    ) -> impl Future<Output = Result<Vec<StagedUploadTarget>, AdminShopifyError>> + Send;

    /// Fetch a product snapshot, or `None` if it does not exist.
    fn get_source_product(
        &self,
        id: &ProductGid,
    ) -> impl Future<Output = Result<Option<SourceProduct>, AdminShopifyError>> + Send;

    /// Create a product with options and media.
    fn create_product(
        &self,
        product: &NewProduct,
    ) -> impl Future<Output = Result<CreatedProduct, AdminShopifyError>> + Send;

    /// Create variants on a product, returning the new variant IDs in order.
    fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[NewVariant],
        strategy: VariantCreateStrategy,
    ) -> impl Future<Output = Result<Vec<String>, AdminShopifyError>> + Send;

    /// Change variant prices.
    fn bulk_update_variant_prices(
        &self,
        product_id: &str,
        updates: &[VariantPriceUpdate],
    ) -> impl Future<Output = Result<(), AdminShopifyError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_shopify_error_display() {
        let err = AdminShopifyError::NotFound("gid://shopify/Product/1".to_string());
        assert_eq!(err.to_string(), "Not found: gid://shopify/Product/1");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError::message("Field not found"),
            GraphQLError::message("Invalid ID"),
        ];
        let err = AdminShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_user_errors_are_aggregated() {
        let err = AdminShopifyError::UserErrors(vec![
            UserError {
                field: vec!["product".to_string(), "title".to_string()],
                message: "can't be blank".to_string(),
            },
            UserError::new("Media limit exceeded"),
        ]);
        assert_eq!(
            err.to_string(),
            "User errors: product.title: can't be blank; Media limit exceeded"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = AdminShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_no_access_token_error() {
        assert!(
            AdminShopifyError::NoAccessToken
                .to_string()
                .contains("No Shopify session")
        );
    }
}
