//! Bulk Duplicator Core - Shared types library.
//!
//! This crate provides the types shared by every bulk duplicator component:
//! - `server` - Shopify Admin API client, upload stager and duplication orchestrator
//! - `cli` - Workflow controller that builds and submits duplication requests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`api`] - HTTP request/response bodies shared by server and CLI
//! - [`types`] - Canonical product IDs, validated prices, tag lists
//! - [`duplicate`] - Per-copy override sets sent to the orchestrator
//! - [`upload`] - File descriptors and staged upload targets
//! - [`form`] - The controller's editable duplication form

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod duplicate;
pub mod form;
pub mod types;
pub mod upload;

pub use duplicate::{DuplicateSpec, MAX_MEDIA_PER_PRODUCT};
pub use types::*;
pub use upload::{FileDescriptor, StagedUploadTarget, UploadParameter};
