//! Unified error handling for the HTTP surface.
//!
//! Every failure becomes `{"error": "<message>"}` with a status that tells
//! the client whether to fix its request (4xx) or look at Shopify (5xx).

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bulk_duplicator_core::{IdError, api::ErrorBody};
use thiserror::Error;

use crate::services::{DuplicationError, UploadError};
use crate::shopify::AdminShopifyError;

/// Application-level error type for the duplicator server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),

    /// Shopify accepted the call but the workflow could not complete.
    #[error("{0}")]
    Upstream(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid API key.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Shopify(AdminShopifyError::NoAccessToken) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Shopify(AdminShopifyError::NotFound(_)) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Shopify(_) | Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        // Don't expose transport details or internal errors to clients
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Shopify(AdminShopifyError::Http(_) | AdminShopifyError::Parse(_)) => {
                "External service error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Validation(message) => Self::BadRequest(message),
            UploadError::TargetCountMismatch { .. } => Self::Upstream(err.to_string()),
            UploadError::Shopify(e) => Self::Shopify(e),
        }
    }
}

impl From<DuplicationError> for AppError {
    fn from(err: DuplicationError) -> Self {
        match err {
            DuplicationError::Validation(message) => Self::BadRequest(message),
            DuplicationError::SourceNotFound(_) => Self::NotFound(err.to_string()),
            DuplicationError::Creation { .. } => Self::Upstream(err.to_string()),
            DuplicationError::Shopify(e) => Self::Shopify(e),
        }
    }
}

impl From<IdError> for AppError {
    fn from(err: IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
