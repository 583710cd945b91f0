//! Request extractors.
//!
//! - `auth` - Bearer API key check for `/api/*` handlers

pub mod auth;

pub use auth::RequireApiKey;
