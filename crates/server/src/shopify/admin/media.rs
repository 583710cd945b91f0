//! Staged upload operations for the Admin API.

use bulk_duplicator_core::{FileDescriptor, StagedUploadTarget};
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError, GraphQLError,
    conversions::{convert_staged_target, convert_user_errors},
    queries::StagedUploadsCreate,
};

impl AdminClient {
    /// Create staged upload targets for image files.
    ///
    /// Each target is a presigned POST destination; the caller uploads the
    /// file there and then references `resource_url` as a media source.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn create_staged_uploads(
        &self,
        files: &[FileDescriptor],
    ) -> Result<Vec<StagedUploadTarget>, AdminShopifyError> {
        use super::queries::staged_uploads_create::{
            StagedUploadHttpMethodType, StagedUploadInput, StagedUploadTargetGenerateUploadResource,
            Variables,
        };

        let variables = Variables {
            input: files
                .iter()
                .map(|f| StagedUploadInput {
                    filename: f.filename.clone(),
                    mime_type: f.mime_type.clone(),
                    http_method: StagedUploadHttpMethodType::Post,
                    resource: StagedUploadTargetGenerateUploadResource::Image,
                    file_size: Some(f.file_size.to_string()),
                })
                .collect(),
        };

        let response = self.execute::<StagedUploadsCreate>(variables).await?;

        if let Some(payload) = response.staged_uploads_create {
            if !payload.user_errors.is_empty() {
                return Err(AdminShopifyError::UserErrors(convert_user_errors(
                    payload.user_errors,
                )));
            }

            return Ok(payload
                .staged_targets
                .unwrap_or_default()
                .into_iter()
                .map(convert_staged_target)
                .collect());
        }

        Err(AdminShopifyError::GraphQL(vec![GraphQLError::message(
            "Staged upload creation failed",
        )]))
    }
}
