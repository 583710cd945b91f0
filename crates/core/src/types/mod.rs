//! Core types for the bulk duplicator.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod tags;

pub use id::{IdError, PRODUCT_GID_PREFIX, ProductGid};
pub use price::{Price, PriceError};
pub use tags::{TagsInput, normalize_tags};
