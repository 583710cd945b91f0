//! Request and response bodies of the duplicator's HTTP API.
//!
//! Shared by the server (which deserializes requests) and the CLI (which
//! builds them), so both sides agree on the camelCase wire format.

use serde::{Deserialize, Serialize};

use crate::{DuplicateSpec, FileDescriptor, StagedUploadTarget};

/// `POST /api/uploads/prepare` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareUploadsRequest {
    pub files: Vec<FileDescriptor>,
}

/// `POST /api/uploads/prepare` response. Targets are in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareUploadsResponse {
    pub targets: Vec<StagedUploadTarget>,
}

/// `POST /api/products/bulk-duplicate` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDuplicateRequest {
    /// Canonical, bare numeric, or path-suffixed product ID.
    pub source_product_id: String,
    pub duplicates: Vec<DuplicateSpec>,
}

/// `POST /api/products/bulk-duplicate` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDuplicateResponse {
    /// Created product IDs, in request order.
    pub product_ids: Vec<String>,
    pub count: usize,
}

/// Product summary returned by `GET /api/products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    /// Option names, in order.
    pub options: Vec<String>,
    pub variant_count: usize,
    pub image_urls: Vec<String>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
