//! Type-safe price representation using decimal arithmetic.
//!
//! Shopify's `Money` scalar is a decimal string. Price overrides are parsed
//! into a [`Decimal`] up front so a typo fails the request before any product
//! is created, and are sent back to the API in their original scale.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The value is not a decimal number.
    #[error("Invalid price: {0}")]
    Invalid(String),

    /// The value is below zero.
    #[error("Price cannot be negative: {0}")]
    Negative(String),
}

/// A non-negative variant price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(Decimal);

impl Price {
    /// Parse a price string such as `"9.99"`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the value is not a decimal or is negative.
    pub fn parse(raw: &str) -> Result<Self, PriceError> {
        let trimmed = raw.trim();
        let amount =
            Decimal::from_str(trimmed).map_err(|_| PriceError::Invalid(trimmed.to_string()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(trimmed.to_string()));
        }
        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Price {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}
