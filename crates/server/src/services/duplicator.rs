//! Duplication orchestrator.
//!
//! Copies one source product N times, sequentially:
//!
//! 1. Validate the request (product ID, non-empty duplicate list)
//! 2. Fetch the source product once
//! 3. For each duplicate: create the product with its options and media,
//!    replicate the source variants, then apply the price override
//! 4. Pause [`INTER_DUPLICATE_DELAY`] between duplicates
//!
//! A failed product creation aborts the run. Products created before the
//! failure stay in the store; the error carries their IDs. Variant and price
//! failures, including an unparseable price override, are logged and never
//! abort.

use std::time::Duration;

use bulk_duplicator_core::{DuplicateSpec, IdError, Price, PriceError, ProductGid};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::shopify::{
    AdminApi, AdminShopifyError, CreatedProduct, NewProduct, NewProductOption, NewVariant,
    NewVariantOptionValue, SourceProduct, VariantCreateStrategy, VariantPriceUpdate,
    format_user_errors,
};

/// Pause between consecutive duplicates to stay under Shopify's rate limits.
pub const INTER_DUPLICATE_DELAY: Duration = Duration::from_millis(250);

/// Errors from [`bulk_duplicate_products`].
#[derive(Debug, Error)]
pub enum DuplicationError {
    /// The request was rejected before any remote call.
    #[error("{0}")]
    Validation(String),

    /// The source product does not exist.
    #[error("Source product not found: {0}")]
    SourceNotFound(ProductGid),

    /// Creating a duplicate failed; the run stopped there.
    #[error("Failed to create duplicate {index}: {message}")]
    Creation {
        /// 1-based position of the failed duplicate.
        index: usize,
        /// Remote error messages.
        message: String,
        /// Products created before the failure (not rolled back).
        created: Vec<String>,
    },

    /// Fetching the source product failed.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),
}

impl From<IdError> for DuplicationError {
    fn from(err: IdError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// IDs of the products a successful run created, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicationSummary {
    pub product_ids: Vec<String>,
}

impl DuplicationSummary {
    #[must_use]
    pub fn count(&self) -> usize {
        self.product_ids.len()
    }
}

/// Result of one step of the duplication loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateOutcome {
    /// The product exists. `warnings` lists variant or price steps that
    /// failed after creation.
    Created {
        index: usize,
        product_id: String,
        warnings: Vec<String>,
    },
    /// Product creation failed; no later duplicate was attempted.
    Aborted { index: usize, message: String },
}

/// A duplicate whose inputs are fully resolved against the source.
#[derive(Debug, Clone)]
struct PlannedDuplicate {
    /// 1-based.
    index: usize,
    product: NewProduct,
    price: Result<Option<Price>, PriceError>,
}

/// Create one copy of the source product per entry in `duplicates`.
///
/// # Errors
///
/// - [`DuplicationError::Validation`] for a malformed ID or an empty list
///   (no remote call is made)
/// - [`DuplicationError::SourceNotFound`] if the product does not exist
/// - [`DuplicationError::Creation`] if a product creation fails
/// - [`DuplicationError::Shopify`] if fetching the source fails
#[instrument(
    skip(admin, duplicates),
    fields(run_id = %Uuid::new_v4(), duplicate_count = duplicates.len())
)]
pub async fn bulk_duplicate_products<A: AdminApi>(
    admin: &A,
    source_product_id: &str,
    duplicates: &[DuplicateSpec],
) -> Result<DuplicationSummary, DuplicationError> {
    let product_id = ProductGid::normalize(source_product_id)?;

    if duplicates.is_empty() {
        return Err(DuplicationError::Validation(
            "At least one duplicate is required".to_string(),
        ));
    }

    let source = admin
        .get_source_product(&product_id)
        .await?
        .ok_or(DuplicationError::SourceNotFound(product_id))?;

    info!(
        source = %source.id,
        variants = source.variants.len(),
        images = source.image_urls.len(),
        "Source product loaded"
    );

    let plan: Vec<PlannedDuplicate> = duplicates
        .iter()
        .enumerate()
        .map(|(position, spec)| PlannedDuplicate {
            index: position + 1,
            product: build_new_product(&source, spec),
            price: spec.price_override(),
        })
        .collect();

    let outcomes = run_duplicates(admin, &source, &plan).await;
    let result = summarize(outcomes);

    match &result {
        Ok(summary) => info!(count = summary.count(), "Bulk duplication complete"),
        Err(DuplicationError::Creation {
            index,
            message,
            created,
        }) => error!(
            index,
            message = %message,
            created = ?created,
            "Bulk duplication aborted; created products were kept"
        ),
        Err(_) => {}
    }

    result
}

/// Resolve a duplicate's fields against the source product.
///
/// Blank string overrides fall back to the source value. Supplied tags
/// replace the source tags, even when empty.
fn build_new_product(source: &SourceProduct, spec: &DuplicateSpec) -> NewProduct {
    NewProduct {
        title: spec.title_override().unwrap_or(&source.title).to_string(),
        description_html: spec
            .description_override()
            .unwrap_or(&source.description_html)
            .to_string(),
        vendor: spec.vendor_override().unwrap_or(&source.vendor).to_string(),
        product_type: spec
            .product_type_override()
            .unwrap_or(&source.product_type)
            .to_string(),
        tags: spec.tags_override().unwrap_or_else(|| source.tags.clone()),
        options: source
            .options
            .iter()
            .map(|o| NewProductOption {
                name: o.name.clone(),
                values: o.values.clone(),
            })
            .collect(),
        media_urls: spec.resolve_media_urls(&source.image_urls),
    }
}

/// Rebuild the source variants against the new product's option IDs.
///
/// Options are matched by exact name; an unmatched name leaves the ID unset.
fn map_variants(source: &SourceProduct, created: &CreatedProduct) -> Vec<NewVariant> {
    source
        .variants
        .iter()
        .map(|variant| NewVariant {
            price: variant.price.clone(),
            option_values: variant
                .selected_options
                .iter()
                .map(|selected| NewVariantOptionValue {
                    option_id: created.option_id(&selected.name).map(String::from),
                    name: selected.value.clone(),
                })
                .collect(),
        })
        .collect()
}

async fn run_duplicates<A: AdminApi>(
    admin: &A,
    source: &SourceProduct,
    plan: &[PlannedDuplicate],
) -> Vec<DuplicateOutcome> {
    let mut outcomes = Vec::with_capacity(plan.len());

    for (position, planned) in plan.iter().enumerate() {
        if position > 0 {
            tokio::time::sleep(INTER_DUPLICATE_DELAY).await;
        }

        let outcome = duplicate_one(admin, source, planned).await;
        let aborted = matches!(outcome, DuplicateOutcome::Aborted { .. });
        outcomes.push(outcome);

        if aborted {
            break;
        }
    }

    outcomes
}

#[instrument(skip_all, fields(duplicate = planned.index))]
async fn duplicate_one<A: AdminApi>(
    admin: &A,
    source: &SourceProduct,
    planned: &PlannedDuplicate,
) -> DuplicateOutcome {
    let created = match admin.create_product(&planned.product).await {
        Ok(created) => created,
        Err(err) => {
            return DuplicateOutcome::Aborted {
                index: planned.index,
                message: creation_failure_message(&err),
            };
        }
    };

    let mut warnings = Vec::new();

    let price = match &planned.price {
        Ok(price) => *price,
        Err(e) => {
            warn!(product_id = %created.id, error = %e, "Price override skipped");
            warnings.push(format!("Price override skipped: {e}"));
            None
        }
    };

    if source.variants.is_empty() {
        if let Some(price) = price {
            match created.first_variant_id.as_deref() {
                Some(variant_id) => {
                    if let Err(e) = apply_price(admin, &created.id, variant_id, price).await {
                        warn!(product_id = %created.id, error = %e, "Price override failed");
                        warnings.push(format!("Price override failed: {e}"));
                    }
                }
                None => {
                    warn!(product_id = %created.id, "No standalone variant to price");
                    warnings.push("No standalone variant to price".to_string());
                }
            }
        }
    } else {
        let variants = map_variants(source, &created);
        match admin
            .bulk_create_variants(
                &created.id,
                &variants,
                VariantCreateStrategy::RemoveStandaloneVariant,
            )
            .await
        {
            Ok(variant_ids) => {
                if let Some(price) = price {
                    match variant_ids.first() {
                        Some(first) => {
                            if let Err(e) = apply_price(admin, &created.id, first, price).await {
                                warn!(product_id = %created.id, error = %e, "Price override failed");
                                warnings.push(format!("Price override failed: {e}"));
                            }
                        }
                        None => {
                            warn!(product_id = %created.id, "No variants created to price");
                            warnings.push("No variants created to price".to_string());
                        }
                    }
                }
            }
            Err(e) => {
                warn!(product_id = %created.id, error = %e, "Variant replication failed");
                warnings.push(format!("Variant replication failed: {e}"));
            }
        }
    }

    info!(product_id = %created.id, "Duplicate created");

    DuplicateOutcome::Created {
        index: planned.index,
        product_id: created.id,
        warnings,
    }
}

/// Message for a failed product creation.
///
/// Business errors are passed through; transport and decoding details stay
/// in the logs.
fn creation_failure_message(err: &AdminShopifyError) -> String {
    match err {
        AdminShopifyError::UserErrors(errors) => format_user_errors(errors),
        AdminShopifyError::Http(_) | AdminShopifyError::Parse(_) => {
            error!(error = %err, "Product creation request failed");
            "External service error".to_string()
        }
        other => other.to_string(),
    }
}

async fn apply_price<A: AdminApi>(
    admin: &A,
    product_id: &str,
    variant_id: &str,
    price: Price,
) -> Result<(), AdminShopifyError> {
    admin
        .bulk_update_variant_prices(
            product_id,
            &[VariantPriceUpdate {
                variant_id: variant_id.to_string(),
                price: price.to_string(),
            }],
        )
        .await
}

/// Fold loop outcomes into the run result.
///
/// The first `Aborted` outcome becomes [`DuplicationError::Creation`]
/// carrying every product ID created before it.
fn summarize(outcomes: Vec<DuplicateOutcome>) -> Result<DuplicationSummary, DuplicationError> {
    let mut product_ids = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        match outcome {
            DuplicateOutcome::Created { product_id, .. } => product_ids.push(product_id),
            DuplicateOutcome::Aborted { index, message } => {
                return Err(DuplicationError::Creation {
                    index,
                    message,
                    created: product_ids,
                });
            }
        }
    }

    Ok(DuplicationSummary { product_ids })
}
