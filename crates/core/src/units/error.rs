//! Conversion error types.

use thiserror::Error;

use super::types::Unit;

/// Errors that can occur during unit conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Quantities must be strictly positive.
    #[error("Quantity must be positive")]
    NonPositiveQuantity,

    /// A packaging ratio needed for the conversion is missing or zero.
    ///
    /// The legacy behavior of assuming 1:1 across heterogeneous units is
    /// deliberately not implemented: for planar products it silently
    /// corrupts stock.
    #[error("Missing packaging ratio for {unit} conversion")]
    AmbiguousRatio {
        /// The unit whose ratio is missing.
        unit: Unit,
    },

    /// The product has no parseable dimension string, so piece counts
    /// cannot be converted to area.
    #[error("Product has no parseable dimensions for area conversion")]
    MissingDimensions,

    /// No conversion path exists between these units.
    #[error("Cannot convert from {from} to {to}")]
    UnsupportedConversion {
        /// The sale/purchase unit.
        from: Unit,
        /// The stocking unit.
        to: Unit,
    },
}

impl ConversionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            Self::AmbiguousRatio { .. } => "CONVERSION_AMBIGUOUS",
            Self::MissingDimensions => "MISSING_DIMENSIONS",
            Self::UnsupportedConversion { .. } => "UNSUPPORTED_CONVERSION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveQuantity => 400,
            Self::AmbiguousRatio { .. }
            | Self::MissingDimensions
            | Self::UnsupportedConversion { .. } => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ConversionError::AmbiguousRatio { unit: Unit::Box }.error_code(),
            "CONVERSION_AMBIGUOUS"
        );
        assert_eq!(
            ConversionError::MissingDimensions.error_code(),
            "MISSING_DIMENSIONS"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConversionError::UnsupportedConversion {
                from: Unit::SquareMeter,
                to: Unit::Piece,
            }
            .to_string(),
            "Cannot convert from square_meter to piece"
        );
    }
}
