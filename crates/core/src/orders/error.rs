//! Order error types.

use thiserror::Error;
use uuid::Uuid;

use crate::accounting::AccountingError;
use crate::inventory::InventoryError;
use crate::pricing::PricingError;
use crate::units::ConversionError;

use super::types::OrderStatus;

/// Errors that can occur during order state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The requested transition is not in the transition table.
    #[error("Invalid order transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current status.
        from: OrderStatus,
        /// Rejected target status.
        to: OrderStatus,
    },

    /// Items can only be added or removed while the order is pending.
    #[error("Order is not editable in status {0}")]
    NotEditable(OrderStatus),

    /// Confirmation requires a strictly positive total.
    #[error("Cannot confirm an order with a non-positive total")]
    ZeroTotal,

    /// Payment recorded at confirmation cannot be negative.
    #[error("Payment amount cannot be negative")]
    NegativePayment,

    /// Orders can only be deleted while pending.
    #[error("Can only delete pending orders, status is {0}")]
    CanOnlyDeletePending(OrderStatus),

    /// Cancelled orders cannot be edited.
    #[error("Cannot edit a cancelled order")]
    CannotEditCancelled,

    /// An order must have at least one item.
    #[error("Order must have at least one item")]
    EmptyOrder,

    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    /// A stock operation on an order line failed.
    #[error(transparent)]
    Stock(#[from] InventoryError),

    /// Unit conversion of a line quantity failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Price resolution for a new line failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Recording or reversing the cash entries failed.
    #[error(transparent)]
    Accounting(#[from] AccountingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl OrderError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::NotEditable(_) => "ORDER_NOT_EDITABLE",
            Self::ZeroTotal => "ZERO_TOTAL",
            Self::NegativePayment => "NEGATIVE_PAYMENT",
            Self::CanOnlyDeletePending(_) => "CAN_ONLY_DELETE_PENDING",
            Self::CannotEditCancelled => "CANNOT_EDIT_CANCELLED",
            Self::EmptyOrder => "EMPTY_ORDER",
            Self::NotFound(_) => "ORDER_NOT_FOUND",
            Self::Stock(inner) => inner.error_code(),
            Self::Conversion(inner) => inner.error_code(),
            Self::Pricing(inner) => inner.error_code(),
            Self::Accounting(inner) => inner.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::NegativePayment => 400,
            Self::Stock(inner) => inner.http_status_code(),
            Self::Conversion(inner) => inner.http_status_code(),
            Self::Pricing(inner) => inner.http_status_code(),
            Self::Accounting(inner) => inner.http_status_code(),
            Self::Database(_) => 500,
            _ => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let err = OrderError::InvalidStateTransition {
            from: OrderStatus::Confirmed,
            to: OrderStatus::Cancelled,
        };
        assert_eq!(
            err.to_string(),
            "Invalid order transition from confirmed to cancelled"
        );
        assert_eq!(err.error_code(), "INVALID_STATE_TRANSITION");
    }
}
