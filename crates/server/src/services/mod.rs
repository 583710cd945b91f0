//! Business logic services.
//!
//! # Services
//!
//! - `uploads` - Staged upload targets for local images
//! - `duplicator` - Sequential bulk duplication of one source product
//!
//! Both are generic over [`AdminApi`](crate::shopify::AdminApi) so they can
//! be driven by the real client or an in-memory fake.

pub mod duplicator;
pub mod uploads;

#[cfg(test)]
pub(crate) mod testing;

pub use duplicator::{
    DuplicateOutcome, DuplicationError, DuplicationSummary, INTER_DUPLICATE_DELAY,
    bulk_duplicate_products,
};
pub use uploads::{UploadError, prepare_image_uploads};
