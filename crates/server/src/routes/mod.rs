//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness (Shopify token loaded)
//!
//! # API (Bearer DUPLICATOR_API_KEY)
//! POST /api/uploads/prepare         - Staged upload targets for local images
//! POST /api/products/bulk-duplicate - Create N copies of a product
//! GET  /api/products/{id}           - Product summary for the picker
//! ```

use std::time::Duration;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

pub mod health;
pub mod products;
pub mod uploads;

/// Build the application router with request tracing.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(uploads::router())
        .merge(products::router());

    Router::new()
        .merge(health::router())
        .nest("/api", api)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        #[allow(clippy::cast_possible_truncation)] // request latency fits in u64 ms
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
