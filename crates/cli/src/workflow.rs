//! Submitting a duplication form.

use std::path::PathBuf;

use bulk_duplicator_core::{
    api::BulkDuplicateResponse,
    form::{DuplicationForm, FormError},
};
use thiserror::Error;
use tracing::{info, instrument};

use crate::{api::ApiError, api::DuplicatorClient, uploads::upload_images_if_needed};

/// Errors from the controller workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The plan is structurally valid YAML but unusable.
    #[error("Invalid plan: {0}")]
    Plan(String),

    /// A local file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The plan is not valid YAML for a duplication plan.
    #[error("Failed to parse plan: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A staged upload failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The duplicator server rejected a request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The form cannot be submitted as it stands.
    #[error("{0}")]
    Validation(String),
}

impl From<FormError> for WorkflowError {
    fn from(err: FormError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Upload pending images, then run the duplication once.
///
/// The form is only borrowed, so a failed submission leaves it as it was.
/// Nothing is retried.
///
/// # Errors
///
/// Returns [`WorkflowError`] if an upload fails, the form is incomplete, or
/// the server rejects the duplication.
#[instrument(skip_all, fields(quantity = form.quantity()))]
pub async fn submit(
    client: &DuplicatorClient,
    form: &DuplicationForm,
) -> Result<BulkDuplicateResponse, WorkflowError> {
    let uploaded = upload_images_if_needed(client, form).await?;
    let request = form.build_request(&uploaded)?;

    info!(
        source = %request.source_product_id,
        duplicates = request.duplicates.len(),
        "Submitting duplication"
    );

    Ok(client.bulk_duplicate(&request).await?)
}
