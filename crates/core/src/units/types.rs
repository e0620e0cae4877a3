//! Unit and packaging domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quantity unit for stock, sale, and purchase lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// A single tile.
    Piece,
    /// A box (colis) of tiles.
    Box,
    /// A pallet of boxes.
    Pallet,
    /// Square metres, the stocking unit for planar products.
    SquareMeter,
}

impl Unit {
    /// Returns the string representation of the unit.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Piece => "piece",
            Self::Box => "box",
            Self::Pallet => "pallet",
            Self::SquareMeter => "square_meter",
        }
    }

    /// Parses a unit from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "piece" | "pc" => Some(Self::Piece),
            "box" | "colis" => Some(Self::Box),
            "pallet" | "palette" => Some(Self::Pallet),
            "square_meter" | "m2" | "sqm" => Some(Self::SquareMeter),
            _ => None,
        }
    }

    /// Returns true for units counted in whole packages (box, pallet).
    #[must_use]
    pub fn is_packaged(&self) -> bool {
        matches!(self, Self::Box | Self::Pallet)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-product packaging metadata required for unit conversion.
///
/// This is a projection of the product catalog row; it carries no identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPackaging {
    /// The unit in which `quantity_on_hand` is measured.
    pub stocking_unit: Unit,
    /// Dimension string such as `"60x60"` (centimetres), when the product
    /// is a planar material.
    pub dimensions: Option<String>,
    /// Pieces per box; zero means unknown.
    pub pieces_per_box: Decimal,
    /// Boxes per pallet; zero means unknown.
    pub boxes_per_pallet: Decimal,
}

impl ProductPackaging {
    /// Packaging for a planar product stocked in m².
    #[must_use]
    pub fn planar(
        dimensions: impl Into<String>,
        pieces_per_box: Decimal,
        boxes_per_pallet: Decimal,
    ) -> Self {
        Self {
            stocking_unit: Unit::SquareMeter,
            dimensions: Some(dimensions.into()),
            pieces_per_box,
            boxes_per_pallet,
        }
    }

    /// Packaging for a product stocked by the piece (trim, decor, fittings).
    #[must_use]
    pub fn by_piece(pieces_per_box: Decimal, boxes_per_pallet: Decimal) -> Self {
        Self {
            stocking_unit: Unit::Piece,
            dimensions: None,
            pieces_per_box,
            boxes_per_pallet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_roundtrip() {
        for unit in [Unit::Piece, Unit::Box, Unit::Pallet, Unit::SquareMeter] {
            assert_eq!(Unit::parse(unit.as_str()), Some(unit));
        }
    }

    #[test]
    fn test_unit_aliases() {
        assert_eq!(Unit::parse("M2"), Some(Unit::SquareMeter));
        assert_eq!(Unit::parse("colis"), Some(Unit::Box));
        assert_eq!(Unit::parse("palette"), Some(Unit::Pallet));
        assert_eq!(Unit::parse("bogus"), None);
    }

    #[test]
    fn test_is_packaged() {
        assert!(Unit::Box.is_packaged());
        assert!(Unit::Pallet.is_packaged());
        assert!(!Unit::Piece.is_packaged());
        assert!(!Unit::SquareMeter.is_packaged());
    }
}
