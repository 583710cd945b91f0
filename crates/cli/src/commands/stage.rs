//! Request staged upload targets without uploading anything.
//!
//! Useful for checking that the server can reach Shopify and that the files
//! are accepted as images.

use std::path::PathBuf;

use bulk_duplicator_cli::{DuplicatorClient, uploads::describe_file};

pub async fn run(
    client: &DuplicatorClient,
    files: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut descriptors = Vec::with_capacity(files.len());
    for path in files {
        descriptors.push(describe_file(path).await?);
    }

    let targets = client.prepare_uploads(descriptors).await?;

    for (path, target) in files.iter().zip(&targets) {
        tracing::info!(
            upload_url = %target.url,
            parameters = target.parameters.len(),
            "{} -> {}",
            path.display(),
            target.resource_url
        );
    }

    Ok(())
}
