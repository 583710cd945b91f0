//! Common domain types shared across Shopify Admin API operations.

use serde::{Deserialize, Serialize};

/// A business error reported by a mutation's `userErrors` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field, if any.
    pub field: Vec<String>,
    /// Human-readable message.
    pub message: String,
}

impl UserError {
    /// Create a user error without a field path.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: Vec::new(),
            message: message.into(),
        }
    }
}

/// Join user errors into one message (`"title: can't be blank; Invalid media"`).
#[must_use]
pub fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| {
            if e.field.is_empty() {
                e.message.clone()
            } else {
                format!("{}: {}", e.field.join("."), e.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
