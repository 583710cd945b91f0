//! Product and variant operations for the Admin API.

use bulk_duplicator_core::ProductGid;
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError, GraphQLError,
    conversions::{convert_created_product, convert_source_product, convert_user_errors},
    queries::{GetProduct, ProductCreate, ProductVariantsBulkCreate, ProductVariantsBulkUpdate},
};
use crate::shopify::types::{
    CreatedProduct, NewProduct, NewVariant, SourceProduct, VariantCreateStrategy,
    VariantPriceUpdate,
};

impl AdminClient {
    /// Get a product with its options, variants, and media.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_source_product(
        &self,
        id: &ProductGid,
    ) -> Result<Option<SourceProduct>, AdminShopifyError> {
        use super::queries::get_product::Variables;

        let variables = Variables {
            id: id.as_str().to_string(),
        };

        let response = self.execute::<GetProduct>(variables).await?;

        Ok(response.product.map(convert_source_product))
    }

    /// Create a product with its option schema and media.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, product), fields(title = %product.title, media = product.media_urls.len()))]
    pub async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<CreatedProduct, AdminShopifyError> {
        use super::queries::product_create::{
            CreateMediaInput, MediaContentType, OptionCreateInput, OptionValueCreateInput,
            ProductCreateInput, Variables,
        };

        let variables = Variables {
            product: ProductCreateInput {
                title: product.title.clone(),
                description_html: product.description_html.clone(),
                vendor: product.vendor.clone(),
                product_type: product.product_type.clone(),
                tags: product.tags.clone(),
                product_options: product
                    .options
                    .iter()
                    .map(|o| OptionCreateInput {
                        name: o.name.clone(),
                        values: o
                            .values
                            .iter()
                            .map(|v| OptionValueCreateInput { name: v.clone() })
                            .collect(),
                    })
                    .collect(),
            },
            media: product
                .media_urls
                .iter()
                .map(|url| CreateMediaInput {
                    original_source: url.clone(),
                    media_content_type: MediaContentType::Image,
                })
                .collect(),
        };

        let response = self.execute::<ProductCreate>(variables).await?;

        if let Some(payload) = response.product_create {
            if !payload.user_errors.is_empty() {
                return Err(AdminShopifyError::UserErrors(convert_user_errors(
                    payload.user_errors,
                )));
            }

            if let Some(created) = payload.product {
                return Ok(convert_created_product(created));
            }
        }

        Err(AdminShopifyError::GraphQL(vec![GraphQLError::message(
            "Product creation failed",
        )]))
    }

    /// Create variants on a product.
    ///
    /// Returns the created variant IDs in the order Shopify reports them.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, variants), fields(variants = variants.len()))]
    pub async fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[NewVariant],
        strategy: VariantCreateStrategy,
    ) -> Result<Vec<String>, AdminShopifyError> {
        use super::queries::product_variants_bulk_create::{
            ProductVariantsBulkInput, Variables, VariantOptionValueInput,
        };

        let variables = Variables {
            product_id: product_id.to_string(),
            variants: variants
                .iter()
                .map(|v| ProductVariantsBulkInput {
                    price: v.price.clone(),
                    option_values: v
                        .option_values
                        .iter()
                        .map(|o| VariantOptionValueInput {
                            option_id: o.option_id.clone(),
                            name: o.name.clone(),
                        })
                        .collect(),
                })
                .collect(),
            strategy: Some(strategy),
        };

        let response = self.execute::<ProductVariantsBulkCreate>(variables).await?;

        if let Some(payload) = response.product_variants_bulk_create {
            if !payload.user_errors.is_empty() {
                return Err(AdminShopifyError::UserErrors(convert_user_errors(
                    payload.user_errors,
                )));
            }

            return Ok(payload
                .product_variants
                .unwrap_or_default()
                .into_iter()
                .map(|v| v.id)
                .collect());
        }

        Err(AdminShopifyError::GraphQL(vec![GraphQLError::message(
            "Variant creation failed",
        )]))
    }

    /// Update variant prices.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, updates), fields(variants = updates.len()))]
    pub async fn bulk_update_variant_prices(
        &self,
        product_id: &str,
        updates: &[VariantPriceUpdate],
    ) -> Result<(), AdminShopifyError> {
        use super::queries::product_variants_bulk_update::{ProductVariantsBulkInput, Variables};

        let variables = Variables {
            product_id: product_id.to_string(),
            variants: updates
                .iter()
                .map(|u| ProductVariantsBulkInput {
                    id: u.variant_id.clone(),
                    price: u.price.clone(),
                })
                .collect(),
        };

        let response = self.execute::<ProductVariantsBulkUpdate>(variables).await?;

        if let Some(payload) = response.product_variants_bulk_update {
            if !payload.user_errors.is_empty() {
                return Err(AdminShopifyError::UserErrors(convert_user_errors(
                    payload.user_errors,
                )));
            }

            return Ok(());
        }

        Err(AdminShopifyError::GraphQL(vec![GraphQLError::message(
            "Variant price update failed",
        )]))
    }
}
