//! Bulk Duplicator workflow controller.
//!
//! Drives a duplication run from the merchant's side: load a plan into a
//! [`DuplicationForm`](bulk_duplicator_core::form::DuplicationForm), upload
//! local images through staged targets, submit the request, report the
//! result. The `dup-cli` binary wraps these steps in subcommands.
//!
//! # Modules
//!
//! - [`api`] - HTTP client for the duplicator server
//! - [`plan`] - YAML duplication plans
//! - [`uploads`] - Staged image uploads
//! - [`workflow`] - Submission and error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod plan;
pub mod uploads;
pub mod workflow;

pub use api::{ApiError, DuplicatorClient};
pub use plan::Plan;
pub use uploads::upload_images_if_needed;
pub use workflow::{WorkflowError, submit};
