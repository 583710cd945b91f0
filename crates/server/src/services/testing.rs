//! In-memory [`AdminApi`] for service tests.

#![allow(clippy::unwrap_used)]

use std::{collections::HashMap, sync::Mutex};

use bulk_duplicator_core::{FileDescriptor, ProductGid, StagedUploadTarget, UploadParameter};

use crate::shopify::{
    AdminApi, AdminShopifyError, CreatedProduct, NewProduct, NewVariant, ProductOption,
    SelectedOption, SourceProduct, SourceVariant, UserError, VariantCreateStrategy,
    VariantPriceUpdate,
};

/// One recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    StagedUploads(Vec<FileDescriptor>),
    GetProduct(String),
    CreateProduct(NewProduct),
    BulkCreateVariants {
        product_id: String,
        variants: Vec<NewVariant>,
        strategy: VariantCreateStrategy,
    },
    BulkUpdatePrices {
        product_id: String,
        updates: Vec<VariantPriceUpdate>,
    },
}

/// Records every call and answers from canned data.
///
/// The n-th created product (1-based) gets ID `gid://shopify/Product/{1000 + n}`
/// and standalone variant `gid://shopify/ProductVariant/{1000 + n}`. Variants
/// created on it are `{product_id}/variant/{position}`.
#[derive(Debug, Default)]
pub struct FakeAdmin {
    source: Option<SourceProduct>,
    staged_target_count: Option<usize>,
    staged_upload_errors: Vec<UserError>,
    creation_failures: HashMap<usize, String>,
    variant_failure: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: SourceProduct) -> Self {
        self.source = Some(source);
        self
    }

    /// Return this many staged targets regardless of the request.
    pub fn with_staged_target_count(mut self, count: usize) -> Self {
        self.staged_target_count = Some(count);
        self
    }

    pub fn with_staged_upload_errors(mut self, errors: Vec<UserError>) -> Self {
        self.staged_upload_errors = errors;
        self
    }

    /// Make the `attempt`-th product creation (1-based) fail with a `title`
    /// user error.
    pub fn fail_creation(mut self, attempt: usize, message: &str) -> Self {
        self.creation_failures.insert(attempt, message.to_string());
        self
    }

    pub fn fail_variant_creation(mut self, message: &str) -> Self {
        self.variant_failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, Call::CreateProduct(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AdminApi for FakeAdmin {
    async fn create_staged_uploads(
        &self,
        files: &[FileDescriptor],
    ) -> Result<Vec<StagedUploadTarget>, AdminShopifyError> {
        self.record(Call::StagedUploads(files.to_vec()));

        if !self.staged_upload_errors.is_empty() {
            return Err(AdminShopifyError::UserErrors(
                self.staged_upload_errors.clone(),
            ));
        }

        let count = self.staged_target_count.unwrap_or(files.len());
        Ok(files
            .iter()
            .cycle()
            .take(count)
            .map(|f| StagedUploadTarget {
                url: "https://storage.test/upload".to_string(),
                resource_url: format!("https://storage.test/tmp/{}", f.filename),
                parameters: vec![UploadParameter {
                    name: "key".to_string(),
                    value: format!("tmp/{}", f.filename),
                }],
            })
            .collect())
    }

    async fn get_source_product(
        &self,
        id: &ProductGid,
    ) -> Result<Option<SourceProduct>, AdminShopifyError> {
        self.record(Call::GetProduct(id.as_str().to_string()));
        Ok(self.source.clone())
    }

    async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<CreatedProduct, AdminShopifyError> {
        self.record(Call::CreateProduct(product.clone()));
        let attempt = self.create_calls();

        if let Some(message) = self.creation_failures.get(&attempt) {
            return Err(AdminShopifyError::UserErrors(vec![UserError {
                field: vec!["title".to_string()],
                message: message.clone(),
            }]));
        }

        let number = 1000 + attempt;
        Ok(CreatedProduct {
            id: format!("gid://shopify/Product/{number}"),
            option_ids: product
                .options
                .iter()
                .enumerate()
                .map(|(i, o)| {
                    (
                        o.name.clone(),
                        format!("gid://shopify/ProductOption/{number}{}", i + 1),
                    )
                })
                .collect(),
            first_variant_id: Some(format!("gid://shopify/ProductVariant/{number}")),
        })
    }

    async fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[NewVariant],
        strategy: VariantCreateStrategy,
    ) -> Result<Vec<String>, AdminShopifyError> {
        self.record(Call::BulkCreateVariants {
            product_id: product_id.to_string(),
            variants: variants.to_vec(),
            strategy,
        });

        if let Some(message) = &self.variant_failure {
            return Err(AdminShopifyError::UserErrors(vec![UserError::new(
                message.clone(),
            )]));
        }

        Ok((1..=variants.len())
            .map(|position| format!("{product_id}/variant/{position}"))
            .collect())
    }

    async fn bulk_update_variant_prices(
        &self,
        product_id: &str,
        updates: &[VariantPriceUpdate],
    ) -> Result<(), AdminShopifyError> {
        self.record(Call::BulkUpdatePrices {
            product_id: product_id.to_string(),
            updates: updates.to_vec(),
        });
        Ok(())
    }
}

/// A two-variant tee with Size and Color options and two images.
pub fn sample_source() -> SourceProduct {
    let variant = |id: &str, price: &str, size: &str| SourceVariant {
        id: format!("gid://shopify/ProductVariant/{id}"),
        price: price.to_string(),
        selected_options: vec![
            SelectedOption {
                name: "Size".to_string(),
                value: size.to_string(),
            },
            SelectedOption {
                name: "Color".to_string(),
                value: "Red".to_string(),
            },
        ],
    };

    SourceProduct {
        id: "gid://shopify/Product/12345".to_string(),
        title: "Classic Tee".to_string(),
        description_html: "<p>Soft cotton.</p>".to_string(),
        vendor: "Acme".to_string(),
        product_type: "Shirt".to_string(),
        tags: vec!["cotton".to_string(), "basics".to_string()],
        options: vec![
            ProductOption {
                id: "gid://shopify/ProductOption/1".to_string(),
                name: "Size".to_string(),
                values: vec!["Small".to_string(), "Large".to_string()],
            },
            ProductOption {
                id: "gid://shopify/ProductOption/2".to_string(),
                name: "Color".to_string(),
                values: vec!["Red".to_string()],
            },
        ],
        variants: vec![variant("1", "10.00", "Small"), variant("2", "12.00", "Large")],
        image_urls: vec![
            "https://cdn.test/front.jpg".to_string(),
            "https://cdn.test/back.jpg".to_string(),
        ],
    }
}
