//! HTTP client for the duplicator server.

use std::time::Duration;

use bulk_duplicator_core::{
    FileDescriptor, ProductGid, StagedUploadTarget,
    api::{
        BulkDuplicateRequest, BulkDuplicateResponse, ErrorBody, PrepareUploadsRequest,
        PrepareUploadsResponse, ProductSummary,
    },
};
use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

// Duplicating many products takes 250 ms per copy plus Shopify round trips.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Errors from talking to the duplicator server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body.
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The server URL could not be parsed.
    #[error("Invalid server URL {0}")]
    InvalidUrl(String),
}

/// Client for the duplicator server's `/api` routes.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct DuplicatorClient {
    http: reqwest::Client,
    base: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for DuplicatorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicatorClient")
            .field("base", &self.base.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl DuplicatorClient {
    /// Create a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an absolute URL,
    /// or [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, ApiError> {
        let mut base =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base,
            api_key,
        })
    }

    /// The underlying HTTP client, shared with storage uploads.
    #[must_use]
    pub const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Fetch the product a duplication run will copy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the server rejects it.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductGid) -> Result<ProductSummary, ApiError> {
        let url = self.endpoint(&format!("api/products/{}", product_id.numeric_id()))?;
        self.send(self.http.get(url)).await
    }

    /// Request one staged upload target per file.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the server rejects it.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn prepare_uploads(
        &self,
        files: Vec<FileDescriptor>,
    ) -> Result<Vec<StagedUploadTarget>, ApiError> {
        let url = self.endpoint("api/uploads/prepare")?;
        let response: PrepareUploadsResponse = self
            .send(self.http.post(url).json(&PrepareUploadsRequest { files }))
            .await?;
        Ok(response.targets)
    }

    /// Run a bulk duplication.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the server rejects it.
    #[instrument(skip(self, request), fields(duplicates = request.duplicates.len()))]
    pub async fn bulk_duplicate(
        &self,
        request: &BulkDuplicateRequest,
    ) -> Result<BulkDuplicateResponse, ApiError> {
        let url = self.endpoint("api/products/bulk-duplicate")?;
        self.send(self.http.post(url).json(request)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        Ok(response.json().await?)
    }
}

/// Turn an error response into [`ApiError::Server`], preferring the JSON
/// `error` field over the raw body.
async fn server_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    debug!(status, body = %body, "Server error response");

    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body
            }
        });

    ApiError::Server { status, message }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bulk_duplicator_core::DuplicateSpec;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const KEY: &str = "test-api-key";

    fn client_for(server: &MockServer) -> DuplicatorClient {
        DuplicatorClient::new(&server.uri(), SecretString::from(KEY)).unwrap()
    }

    #[test]
    fn test_invalid_base_url() {
        let err = DuplicatorClient::new("not a url", SecretString::from(KEY)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_base_path_is_kept() {
        let client =
            DuplicatorClient::new("http://host.test/duplicator", SecretString::from(KEY)).unwrap();
        assert_eq!(
            client.endpoint("api/uploads/prepare").unwrap().as_str(),
            "http://host.test/duplicator/api/uploads/prepare"
        );
    }

    #[tokio::test]
    async fn test_bulk_duplicate_sends_bearer_and_camel_case_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/products/bulk-duplicate"))
            .and(header("Authorization", "Bearer test-api-key"))
            .and(body_partial_json(json!({
                "sourceProductId": "12345",
                "duplicates": [{ "title": "Red" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "productIds": ["gid://shopify/Product/1"],
                "count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .bulk_duplicate(&BulkDuplicateRequest {
                source_product_id: "12345".to_string(),
                duplicates: vec![DuplicateSpec {
                    title: Some("Red".to_string()),
                    ..DuplicateSpec::default()
                }],
            })
            .await
            .unwrap();

        assert_eq!(response.count, 1);
        assert_eq!(response.product_ids, vec!["gid://shopify/Product/1"]);
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({
                "error": "Failed to create duplicate 2: title: Title has already been taken"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .bulk_duplicate(&BulkDuplicateRequest {
                source_product_id: "12345".to_string(),
                duplicates: vec![DuplicateSpec::default()],
            })
            .await
            .unwrap_err();

        let ApiError::Server { status, message } = err else {
            panic!("expected server error, got {err:?}");
        };
        assert_eq!(status, 502);
        assert_eq!(
            message,
            "Failed to create duplicate 2: title: Title has already been taken"
        );
    }

    #[tokio::test]
    async fn test_get_product_uses_numeric_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/products/12345"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "gid://shopify/Product/12345",
                "title": "Classic Tee",
                "vendor": "Acme",
                "productType": "Shirt",
                "tags": [],
                "options": ["Size"],
                "variantCount": 2,
                "imageUrls": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let product = client_for(&server)
            .get_product(&ProductGid::normalize("gid://shopify/Product/12345").unwrap())
            .await
            .unwrap();

        assert_eq!(product.title, "Classic Tee");
        assert_eq!(product.variant_count, 2);
    }
}
