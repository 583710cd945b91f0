//! Shopify Admin API GraphQL client.
//!
//! This module provides a type-safe client for the Admin API operations the
//! duplicator needs. Requests are authenticated with an Admin API access
//! token; without one every call fails with
//! [`AdminShopifyError::NoAccessToken`].

use std::{sync::Arc, time::Duration};

use bulk_duplicator_core::{FileDescriptor, ProductGid, StagedUploadTarget};
use graphql_client::GraphQLQuery;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tokio::sync::RwLock;

use crate::config::ShopifyAdminConfig;

use super::{
    AdminApi, AdminShopifyError, GraphQLError, GraphQLErrorLocation,
    types::{
        CreatedProduct, NewProduct, NewVariant, SourceProduct, VariantCreateStrategy,
        VariantPriceUpdate,
    },
};

mod conversions;
mod media;
mod products;
pub mod queries;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; clones share the HTTP connection pool and the access
/// token.
///
/// # Security
///
/// The access token has HIGH PRIVILEGE write access to the catalog.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    /// In-memory token (loaded from config or set at runtime)
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("endpoint", &self.inner.endpoint)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a client for the store in `config`.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ShopifyAdminConfig) -> Result<Self, AdminShopifyError> {
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            config.store, config.api_version
        );
        Self::with_endpoint(endpoint, config.access_token.clone())
    }

    /// Create a client that posts to an explicit GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Http` if the HTTP client cannot be built.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: Option<SecretString>,
    ) -> Result<Self, AdminShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                endpoint: endpoint.into(),
                token: RwLock::new(access_token),
            }),
        })
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Set the access token (e.g., after an app install).
    pub async fn set_access_token(&self, token: SecretString) {
        *self.inner.token.write().await = Some(token);
    }

    /// Check if an access token is loaded.
    pub async fn has_access_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    /// Clear the access token.
    pub async fn clear_access_token(&self) {
        *self.inner.token.write().await = None;
    }

    /// Get the current access token string.
    async fn access_token(&self) -> Result<String, AdminShopifyError> {
        let token = self.inner.token.read().await;
        token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
            .ok_or(AdminShopifyError::NoAccessToken)
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let access_token = self.access_token().await?;
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", &access_token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(AdminShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        let response = response.error_for_status()?;
        let graphql_response: GraphQLResponse<Q::ResponseData> = response.json().await?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response
            .data
            .ok_or_else(|| AdminShopifyError::GraphQL(vec![GraphQLError::message("No data in response")]))
    }
}

// Inherent methods live in `products` and `media`; the trait forwards to them.
impl AdminApi for AdminClient {
    async fn create_staged_uploads(
        &self,
        files: &[FileDescriptor],
    ) -> Result<Vec<StagedUploadTarget>, AdminShopifyError> {
        Self::create_staged_uploads(self, files).await
    }

    async fn get_source_product(
        &self,
        id: &ProductGid,
    ) -> Result<Option<SourceProduct>, AdminShopifyError> {
        Self::get_source_product(self, id).await
    }

    async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<CreatedProduct, AdminShopifyError> {
        Self::create_product(self, product).await
    }

    async fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[NewVariant],
        strategy: VariantCreateStrategy,
    ) -> Result<Vec<String>, AdminShopifyError> {
        Self::bulk_create_variants(self, product_id, variants, strategy).await
    }

    async fn bulk_update_variant_prices(
        &self,
        product_id: &str,
        updates: &[VariantPriceUpdate],
    ) -> Result<(), AdminShopifyError> {
        Self::bulk_update_variant_prices(self, product_id, updates).await
    }
}
