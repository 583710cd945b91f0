//! Staged upload descriptors and targets.
//!
//! Images are not sent through the duplicator. The client asks for one
//! staged target per local file, posts the file straight to the storage host
//! named by the target, and then references the target's `resource_url` as a
//! product image URL.

use serde::{Deserialize, Serialize};

/// A local file the client wants to upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// File name, including extension.
    pub filename: String,
    /// MIME type (e.g., `image/jpeg`).
    pub mime_type: String,
    /// Size in bytes.
    pub file_size: u64,
}

/// A single form field that must accompany the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadParameter {
    pub name: String,
    pub value: String,
}

/// Staged upload target for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUploadTarget {
    /// The URL to upload the file to.
    pub url: String,
    /// The resource URL to reference once the upload completes.
    pub resource_url: String,
    /// Form parameters to include with the upload, in order.
    pub parameters: Vec<UploadParameter>,
}
