//! Run a duplication plan.
//!
//! # Usage
//!
//! ```bash
//! dup-cli duplicate plans/summer.yaml
//! dup-cli duplicate plans/summer.yaml --quantity 5
//! ```

use std::path::Path;

use bulk_duplicator_cli::{DuplicatorClient, Plan, submit};
use bulk_duplicator_core::ProductGid;

/// Load `plan_path`, upload its local images and duplicate the source.
pub async fn run(
    client: &DuplicatorClient,
    plan_path: &Path,
    quantity: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = Plan::load(plan_path).await?;
    let base_dir = plan_path.parent().unwrap_or_else(|| Path::new("."));
    let form = plan.into_form(base_dir, quantity).await?;

    if let Some(source) = form.source_product_id() {
        let source = ProductGid::normalize(source)?;
        let product = client.get_product(&source).await?;
        tracing::info!(
            "Duplicating {} ({}) {} time(s)",
            product.title,
            product.id,
            form.quantity()
        );
    }

    let pending = form.pending_uploads().len();
    if pending > 0 {
        tracing::info!("Uploading {pending} image(s)...");
    }

    let response = submit(client, &form).await?;

    tracing::info!("Created {} duplicate(s)", response.count);
    for (n, id) in response.product_ids.iter().enumerate() {
        tracing::info!("  {}. {id}", n + 1);
    }

    Ok(())
}
