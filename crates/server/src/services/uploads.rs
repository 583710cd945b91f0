//! Upload stager.
//!
//! Turns local file descriptors into presigned upload targets. The client
//! posts each file to its target and later references the target's
//! `resource_url` as a media source when duplicating.

use bulk_duplicator_core::{FileDescriptor, StagedUploadTarget};
use thiserror::Error;
use tracing::{info, instrument};

use crate::shopify::{AdminApi, AdminShopifyError};

/// Errors from [`prepare_image_uploads`].
#[derive(Debug, Error)]
pub enum UploadError {
    /// The request was rejected before any remote call.
    #[error("{0}")]
    Validation(String),

    /// Shopify returned a different number of targets than files requested.
    #[error("Expected {expected} upload targets, received {received}")]
    TargetCountMismatch { expected: usize, received: usize },

    /// The Admin API call failed or reported user errors.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),
}

/// Request one staged upload target per file, in input order.
///
/// # Errors
///
/// - [`UploadError::Validation`] for an empty list or a blank filename or
///   MIME type
/// - [`UploadError::Shopify`] when the remote call fails; user errors are
///   aggregated into one message
/// - [`UploadError::TargetCountMismatch`] when the target count differs from
///   the file count
#[instrument(skip(admin, files), fields(files = files.len()))]
pub async fn prepare_image_uploads<A: AdminApi>(
    admin: &A,
    files: &[FileDescriptor],
) -> Result<Vec<StagedUploadTarget>, UploadError> {
    validate_files(files)?;

    let targets = admin.create_staged_uploads(files).await?;

    if targets.len() != files.len() {
        return Err(UploadError::TargetCountMismatch {
            expected: files.len(),
            received: targets.len(),
        });
    }

    info!(targets = targets.len(), "Staged upload targets created");
    Ok(targets)
}

fn validate_files(files: &[FileDescriptor]) -> Result<(), UploadError> {
    if files.is_empty() {
        return Err(UploadError::Validation("No files provided".to_string()));
    }

    for (position, file) in files.iter().enumerate() {
        if file.filename.trim().is_empty() {
            return Err(UploadError::Validation(format!(
                "File {} is missing a filename",
                position + 1
            )));
        }
        if file.mime_type.trim().is_empty() {
            return Err(UploadError::Validation(format!(
                "File {} ({}) is missing a MIME type",
                position + 1,
                file.filename
            )));
        }
    }

    Ok(())
}
