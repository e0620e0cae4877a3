//! Inventory error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during stock-level operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The requested quantity exceeds what is available for reservation.
    ///
    /// Recoverable: the caller can offer a partial-availability flow.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// The quantity requested, in the stocking unit.
        requested: Decimal,
        /// The quantity available (on hand minus reserved).
        available: Decimal,
    },

    /// An adjustment would drive the on-hand quantity negative.
    #[error("Adjustment of {delta} would drive on-hand stock ({on_hand}) negative")]
    NegativeOnHand {
        /// Current on-hand quantity.
        on_hand: Decimal,
        /// The rejected signed delta.
        delta: Decimal,
    },

    /// Stock operations require a strictly positive quantity.
    #[error("Stock quantity must be positive")]
    NonPositiveQuantity,

    /// Could not lock the inventory record within the configured timeout.
    #[error("Timed out waiting for an inventory record lock, please retry")]
    LockTimeout,

    /// Inventory record not found.
    #[error("Inventory record not found for the product/warehouse pair")]
    RecordNotFound,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::NegativeOnHand { .. } => "NEGATIVE_ON_HAND",
            Self::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            Self::LockTimeout => "LOCK_TIMEOUT",
            Self::RecordNotFound => "INVENTORY_RECORD_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InsufficientStock { .. } | Self::NegativeOnHand { .. } => 422,
            Self::NonPositiveQuantity => 400,
            Self::LockTimeout => 423,
            Self::RecordNotFound => 404,
            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_stock_display() {
        let err = InventoryError::InsufficientStock {
            requested: dec!(10),
            available: dec!(7.2),
        };
        assert_eq!(err.to_string(), "Insufficient stock: requested 10, available 7.2");
        assert_eq!(err.error_code(), "INSUFFICIENT_STOCK");
        assert_eq!(err.http_status_code(), 422);
    }
}
