//! Return error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::accounting::AccountingError;
use crate::inventory::InventoryError;
use crate::units::ConversionError;

use super::types::ReturnStatus;

/// Errors that can occur during return processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnError {
    /// Approval, rejection and deletion are pending-only.
    #[error("Return is {0}; only pending returns can change state")]
    InvalidStateTransition(ReturnStatus),

    /// A return must have at least one line.
    #[error("Return must have at least one line")]
    EmptyReturn,

    /// Line quantities must be strictly positive.
    #[error("Return quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    /// Refund amounts cannot be negative.
    #[error("Return amount cannot be negative, got {0}")]
    NegativeAmount(Decimal),

    /// Return not found.
    #[error("Return not found: {0}")]
    NotFound(Uuid),

    /// A stock operation on a return line failed.
    #[error(transparent)]
    Stock(#[from] InventoryError),

    /// Unit conversion of a returned quantity failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Recording the return credit failed.
    #[error(transparent)]
    Accounting(#[from] AccountingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ReturnError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            Self::EmptyReturn => "EMPTY_RETURN",
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::NotFound(_) => "RETURN_NOT_FOUND",
            Self::Stock(inner) => inner.error_code(),
            Self::Conversion(inner) => inner.error_code(),
            Self::Accounting(inner) => inner.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::EmptyReturn | Self::NonPositiveQuantity(_) | Self::NegativeAmount(_) => 400,
            Self::InvalidStateTransition(_) => 422,
            Self::Stock(inner) => inner.http_status_code(),
            Self::Conversion(inner) => inner.http_status_code(),
            Self::Accounting(inner) => inner.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}
