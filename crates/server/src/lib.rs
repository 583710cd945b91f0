//! Bulk Duplicator server library.
//!
//! Exposes two operations over HTTP, both backed by the Shopify Admin API:
//! staging image uploads and creating N customized copies of a product.
//! The crate is a library so the router can be exercised in-process by
//! tests.
//!
//! # Security
//!
//! This crate holds a HIGH PRIVILEGE Shopify Admin API token that can create
//! products. Bind to a private interface and keep `DUPLICATOR_API_KEY`
//! secret.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
