//! Product routes: lookup for the picker and bulk duplication.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use bulk_duplicator_core::{
    ProductGid,
    api::{BulkDuplicateRequest, BulkDuplicateResponse, ProductSummary},
};

use crate::{
    error::AppError, middleware::RequireApiKey, services::bulk_duplicate_products, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/bulk-duplicate", post(bulk_duplicate))
        .route("/products/{id}", get(show))
}

/// `POST /api/products/bulk-duplicate`
async fn bulk_duplicate(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    payload: Result<Json<BulkDuplicateRequest>, JsonRejection>,
) -> Result<Json<BulkDuplicateResponse>, AppError> {
    let Json(request) = payload?;

    let summary = bulk_duplicate_products(
        state.shopify(),
        &request.source_product_id,
        &request.duplicates,
    )
    .await?;

    let count = summary.count();
    Ok(Json(BulkDuplicateResponse {
        product_ids: summary.product_ids,
        count,
    }))
}

/// `GET /api/products/{id}`
///
/// Accepts a GID, a numeric ID, or an admin URL ending in the ID.
async fn show(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductSummary>, AppError> {
    let product_id = ProductGid::normalize(&id)?;

    let product = state
        .shopify()
        .get_source_product(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {product_id}")))?;

    Ok(Json(ProductSummary::from(&product)))
}
