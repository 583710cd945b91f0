//! Staged image uploads.
//!
//! Local images are uploaded in two steps: the server hands out one staged
//! target per file, then each file is posted straight to its target as a
//! multipart form. The target's resource URL is what the duplicate
//! references afterwards.

use std::{collections::HashMap, path::Path};

use bulk_duplicator_core::{
    FileDescriptor, StagedUploadTarget,
    form::{DuplicationForm, ImageKey, LocalImage},
};
use futures::future::try_join_all;
use reqwest::multipart::{Form, Part};
use tracing::{info, instrument};

use crate::{
    api::{ApiError, DuplicatorClient},
    workflow::WorkflowError,
};

/// Upload every pending local image of `form`.
///
/// Returns the resource URL of each uploaded file keyed by its image key.
/// When nothing is pending the map is empty and no request is made.
///
/// # Errors
///
/// Returns [`WorkflowError`] if staging or any upload fails.
#[instrument(skip_all)]
pub async fn upload_images_if_needed(
    client: &DuplicatorClient,
    form: &DuplicationForm,
) -> Result<HashMap<ImageKey, String>, WorkflowError> {
    let pending = form.pending_uploads();
    if pending.is_empty() {
        return Ok(HashMap::new());
    }

    let descriptors = pending.iter().map(|image| image.descriptor.clone()).collect();
    let targets = client.prepare_uploads(descriptors).await?;

    if targets.len() != pending.len() {
        return Err(WorkflowError::Upload(format!(
            "expected {} upload targets, received {}",
            pending.len(),
            targets.len()
        )));
    }

    let uploads = pending
        .iter()
        .zip(targets)
        .map(|(image, target)| upload_one(client.http(), image, target));
    let resource_urls = try_join_all(uploads).await?;

    info!(files = resource_urls.len(), "Images uploaded");

    Ok(pending
        .iter()
        .map(|image| image.key)
        .zip(resource_urls)
        .collect())
}

async fn upload_one(
    http: &reqwest::Client,
    image: &LocalImage,
    target: StagedUploadTarget,
) -> Result<String, WorkflowError> {
    let bytes = tokio::fs::read(&image.path)
        .await
        .map_err(|source| WorkflowError::Io {
            path: image.path.clone(),
            source,
        })?;

    // Target parameters must precede the file field.
    let mut form = Form::new();
    for parameter in target.parameters {
        form = form.text(parameter.name, parameter.value);
    }
    let part = Part::bytes(bytes)
        .file_name(image.descriptor.filename.clone())
        .mime_str(&image.descriptor.mime_type)
        .map_err(ApiError::from)?;
    form = form.part("file", part);

    let response = http
        .post(&target.url)
        .multipart(form)
        .send()
        .await
        .map_err(ApiError::from)?;

    if !response.status().is_success() {
        return Err(WorkflowError::Upload(format!(
            "{} was rejected with status {}",
            image.descriptor.filename,
            response.status()
        )));
    }

    Ok(target.resource_url)
}

/// MIME type of an image file, by extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

/// Describe a local image for staging.
///
/// # Errors
///
/// Returns [`WorkflowError::Io`] if the file cannot be read, or
/// [`WorkflowError::Validation`] if it is not a supported image type.
pub async fn describe_file(path: &Path) -> Result<FileDescriptor, WorkflowError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| WorkflowError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| WorkflowError::Validation(format!("{} has no file name", path.display())))?
        .to_string();

    let mime_type = mime_for_path(path).ok_or_else(|| {
        WorkflowError::Validation(format!("{} is not a supported image type", path.display()))
    })?;

    Ok(FileDescriptor {
        filename,
        mime_type: mime_type.to_string(),
        file_size: metadata.len(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use bulk_duplicator_core::form::OverrideField;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> DuplicatorClient {
        DuplicatorClient::new(&server.uri(), SecretString::from("test-key")).unwrap()
    }

    async fn temp_image(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dup-cli-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join(name);
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("dir/b.webp")), Some("image/webp"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn test_no_pending_files_skips_remote_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let mut form = DuplicationForm::new();
        form.fields_mut().select(OverrideField::Images);
        form.add_image_url(0, "https://cdn.test/hosted.jpg");

        let uploaded = upload_images_if_needed(&client_for(&server), &form)
            .await
            .unwrap();

        assert!(uploaded.is_empty());
    }

    #[tokio::test]
    async fn test_uploads_files_to_staged_targets() {
        let server = MockServer::start().await;
        let image = temp_image("front.png", b"png-bytes").await;

        Mock::given(method("POST"))
            .and(path("/api/uploads/prepare"))
            .and(body_partial_json(json!({
                "files": [{ "filename": "front.png", "mimeType": "image/png", "fileSize": 9 }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "targets": [{
                    "url": format!("{}/storage", server.uri()),
                    "resourceUrl": "https://storage.test/tmp/front.png",
                    "parameters": [{ "name": "key", "value": "tmp/front.png" }]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/storage"))
            .and(body_string_contains("tmp/front.png"))
            .and(body_string_contains("png-bytes"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let mut form = DuplicationForm::new();
        form.fields_mut().select(OverrideField::Images);
        let descriptor = describe_file(&image).await.unwrap();
        let key = form.add_local_image(0, &image, descriptor).unwrap();

        let uploaded = upload_images_if_needed(&client_for(&server), &form)
            .await
            .unwrap();

        assert_eq!(
            uploaded.get(&key).map(String::as_str),
            Some("https://storage.test/tmp/front.png")
        );
    }

    #[tokio::test]
    async fn test_rejected_upload_fails() {
        let server = MockServer::start().await;
        let image = temp_image("back.jpg", b"jpg-bytes").await;

        Mock::given(method("POST"))
            .and(path("/api/uploads/prepare"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "targets": [{
                    "url": format!("{}/storage", server.uri()),
                    "resourceUrl": "https://storage.test/tmp/back.jpg",
                    "parameters": []
                }]
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/storage"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let mut form = DuplicationForm::new();
        form.fields_mut().select(OverrideField::Images);
        let descriptor = describe_file(&image).await.unwrap();
        form.add_local_image(0, &image, descriptor);

        let err = upload_images_if_needed(&client_for(&server), &form)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Upload(_)));
    }
}
