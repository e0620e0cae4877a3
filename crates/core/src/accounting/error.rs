//! Accounting error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while recording cash transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountingError {
    /// Recorded amounts must be strictly positive; the sign comes
    /// from the transaction kind, never from the caller.
    #[error("Cash transaction amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// No cash rows exist for the reference being reversed.
    #[error("No cash transactions found for reference {0}")]
    NothingToReverse(Uuid),

    /// A balance delta was addressed to a counterparty that does not exist.
    #[error("Counterparty not found: {0}")]
    CounterpartyNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AccountingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::NothingToReverse(_) => "NOTHING_TO_REVERSE",
            Self::CounterpartyNotFound(_) => "COUNTERPARTY_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount(_) => 400,
            Self::NothingToReverse(_) | Self::CounterpartyNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }
}
