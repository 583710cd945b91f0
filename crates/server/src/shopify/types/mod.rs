//! Domain types for the Shopify Admin API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL response types in `admin::queries`.

pub mod common;
pub mod product;

// Re-export all types for convenience
pub use common::*;
pub use product::*;
