//! Purchasing error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::inventory::InventoryError;
use crate::units::ConversionError;

use super::types::PurchaseOrderStatus;

/// Errors that can occur during purchase order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchasingError {
    /// A receipt line references an item that is not on the order.
    #[error("Receipt line references unknown purchase order item {0}")]
    UnknownItem(Uuid),

    /// Receipt quantities must be strictly positive.
    #[error("Receipt quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    /// A receipt would push the item past its ordered quantity.
    #[error("Receiving {requested} exceeds remaining quantity {remaining}")]
    OverReceipt {
        /// Quantity on the receipt line.
        requested: Decimal,
        /// Ordered minus already received.
        remaining: Decimal,
    },

    /// Deleting an item with receipts would orphan the receipt rows.
    #[error("Purchase order item {0} has received stock and cannot be removed")]
    ReferentialConflict(Uuid),

    /// An edit shrank an ordered quantity below what was already received.
    #[error("Ordered quantity {ordered} is below the received quantity {received}")]
    OrderedBelowReceived {
        /// New ordered quantity.
        ordered: Decimal,
        /// Quantity already received against the line.
        received: Decimal,
    },

    /// Only pending orders can be cancelled.
    #[error("Cannot cancel purchase order in status {0}")]
    CannotCancel(PurchaseOrderStatus),

    /// Cancelled orders cannot be edited or received against.
    #[error("Purchase order is cancelled")]
    Cancelled,

    /// A receipt must contain at least one line.
    #[error("Goods receipt must have at least one line")]
    EmptyReceipt,

    /// Purchase order not found.
    #[error("Purchase order not found: {0}")]
    NotFound(Uuid),

    /// A stock operation for a receipt or edit failed.
    #[error(transparent)]
    Stock(#[from] InventoryError),

    /// Unit conversion of an ordered quantity failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl PurchasingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownItem(_) => "UNKNOWN_PO_ITEM",
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::OverReceipt { .. } => "OVER_RECEIPT",
            Self::ReferentialConflict(_) => "REFERENTIAL_CONFLICT",
            Self::OrderedBelowReceived { .. } => "ORDERED_BELOW_RECEIVED",
            Self::CannotCancel(_) => "CANNOT_CANCEL",
            Self::Cancelled => "PO_CANCELLED",
            Self::EmptyReceipt => "EMPTY_RECEIPT",
            Self::NotFound(_) => "PO_NOT_FOUND",
            Self::Stock(inner) => inner.error_code(),
            Self::Conversion(inner) => inner.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::NonPositiveQuantity(_) | Self::EmptyReceipt => 400,
            Self::ReferentialConflict(_) | Self::OrderedBelowReceived { .. } => 409,
            Self::Stock(inner) => inner.http_status_code(),
            Self::Conversion(inner) => inner.http_status_code(),
            Self::Database(_) => 500,
            _ => 422,
        }
    }
}
