//! Application state shared across handlers.

use std::sync::Arc;

use crate::{config::DuplicatorConfig, shopify::AdminClient};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DuplicatorConfig,
    shopify: AdminClient,
}

impl AppState {
    #[must_use]
    pub fn new(config: DuplicatorConfig, shopify: AdminClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, shopify }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DuplicatorConfig {
        &self.inner.config
    }

    /// The Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }
}
