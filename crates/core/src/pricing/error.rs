//! Pricing error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during price resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Every waterfall tier was exhausted, including the base price.
    ///
    /// There is deliberately no zero-price sentinel: an unpriced product
    /// cannot be sold.
    #[error("No price found for product {product_id} and customer {customer_id}")]
    PriceNotFound {
        /// The product being priced.
        product_id: Uuid,
        /// The customer the price is for.
        customer_id: Uuid,
    },

    /// An explicitly supplied price must not be negative.
    #[error("Unit price cannot be negative")]
    NegativePrice,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl PricingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PriceNotFound { .. } => "PRICE_NOT_FOUND",
            Self::NegativePrice => "NEGATIVE_PRICE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::PriceNotFound { .. } => 422,
            Self::NegativePrice => 400,
            Self::Database(_) => 500,
        }
    }
}
