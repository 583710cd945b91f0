//! Staged upload route.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use bulk_duplicator_core::api::{PrepareUploadsRequest, PrepareUploadsResponse};

use crate::{
    error::AppError, middleware::RequireApiKey, services::prepare_image_uploads, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/uploads/prepare", post(prepare))
}

/// `POST /api/uploads/prepare`
async fn prepare(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    payload: Result<Json<PrepareUploadsRequest>, JsonRejection>,
) -> Result<Json<PrepareUploadsResponse>, AppError> {
    let Json(request) = payload?;

    let targets = prepare_image_uploads(state.shopify(), &request.files).await?;

    Ok(Json(PrepareUploadsResponse { targets }))
}
