//! API key authentication.
//!
//! Clients send `Authorization: Bearer <DUPLICATOR_API_KEY>`. The key is
//! compared in constant time.

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, header::AUTHORIZATION, request::Parts},
};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::{error::AppError, state::AppState};

/// Extractor that requires a valid API key.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_auth: RequireApiKey) -> &'static str {
///     "authorized"
/// }
/// ```
pub struct RequireApiKey;

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts.headers.get(AUTHORIZATION))
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        if keys_match(token, state.config().api_key.expose_secret()) {
            Ok(Self)
        } else {
            Err(AppError::Unauthorized("invalid API key".to_string()))
        }
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn keys_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let header = HeaderValue::from_static("Bearer abc123");
        assert_eq!(extract_bearer_token(Some(&header)), Some("abc123"));

        let basic = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&basic)), None);

        let empty = HeaderValue::from_static("Bearer   ");
        assert_eq!(extract_bearer_token(Some(&empty)), None);

        assert_eq!(extract_bearer_token(None), None);
    }

    #[test]
    fn test_keys_match() {
        assert!(keys_match("k3y-Value", "k3y-Value"));
        assert!(!keys_match("k3y-Valu", "k3y-Value"));
        assert!(!keys_match("k3y-ValuE", "k3y-Value"));
    }
}
