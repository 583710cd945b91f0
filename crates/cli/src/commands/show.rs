//! Show the product a duplication would copy.

use bulk_duplicator_cli::{ApiError, DuplicatorClient};
use bulk_duplicator_core::ProductGid;

/// Fetch and report a product.
pub async fn run(client: &DuplicatorClient, product: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = ProductGid::normalize(product)?;
    let summary = match client.get_product(&product_id).await {
        Ok(summary) => summary,
        Err(ApiError::Server { status: 404, .. }) => {
            return Err(format!("No product {product_id}").into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        id = %summary.id,
        vendor = %summary.vendor,
        product_type = %summary.product_type,
        variants = summary.variant_count,
        images = summary.image_urls.len(),
        "{}",
        summary.title
    );
    if !summary.options.is_empty() {
        tracing::info!("Options: {}", summary.options.join(", "));
    }
    if !summary.tags.is_empty() {
        tracing::info!("Tags: {}", summary.tags.join(", "));
    }

    Ok(())
}
