//! Unit conversion service.
//!
//! One implementation, called everywhere a sale or purchase quantity must
//! become a stocking-unit delta. Pure function, no side effects.

use rust_decimal::Decimal;
use std::str::FromStr;

use tessera_shared::types::round_qty;

use super::error::ConversionError;
use super::types::{ProductPackaging, Unit};

/// Dimension-string separators tolerated in product size fields.
const DIMENSION_SEPARATORS: [char; 4] = ['x', 'X', '*', '×'];

/// Square centimetres per square metre.
const CM2_PER_M2: u32 = 10_000;

/// Stateless unit conversion service.
pub struct UnitService;

impl UnitService {
    /// Converts a quantity expressed in `unit` into the product's stocking
    /// unit.
    ///
    /// `derived_pieces_per_box` is an optional fallback ratio computed by
    /// the caller from historical data, consulted only when the explicit
    /// `pieces_per_box` is zero. When neither ratio exists the conversion
    /// fails with [`ConversionError::AmbiguousRatio`] rather than assuming
    /// 1:1 across heterogeneous units.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the quantity is not positive, a
    /// required packaging ratio is missing, the product lacks parseable
    /// dimensions for an area conversion, or no conversion path exists.
    pub fn to_stocking_unit(
        packaging: &ProductPackaging,
        quantity: Decimal,
        unit: Unit,
        derived_pieces_per_box: Option<Decimal>,
    ) -> Result<Decimal, ConversionError> {
        if quantity <= Decimal::ZERO {
            return Err(ConversionError::NonPositiveQuantity);
        }
        let factor = Self::stocking_factor(packaging, unit, derived_pieces_per_box)?;
        Ok(round_qty(quantity * factor))
    }

    /// Converts a stocking-unit quantity back into `unit`.
    ///
    /// Inverse of [`Self::to_stocking_unit`]; used for availability
    /// displays and for the invertibility property on planar products.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::to_stocking_unit`].
    pub fn from_stocking_unit(
        packaging: &ProductPackaging,
        quantity_stock: Decimal,
        unit: Unit,
        derived_pieces_per_box: Option<Decimal>,
    ) -> Result<Decimal, ConversionError> {
        if quantity_stock <= Decimal::ZERO {
            return Err(ConversionError::NonPositiveQuantity);
        }
        let factor = Self::stocking_factor(packaging, unit, derived_pieces_per_box)?;
        Ok(round_qty(quantity_stock / factor))
    }

    /// Returns the unrounded stocking-unit amount represented by one `unit`
    /// of the product.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if a ratio or dimension needed for the
    /// path is missing, or if no path exists.
    pub fn stocking_factor(
        packaging: &ProductPackaging,
        unit: Unit,
        derived_pieces_per_box: Option<Decimal>,
    ) -> Result<Decimal, ConversionError> {
        if unit == packaging.stocking_unit {
            return Ok(Decimal::ONE);
        }

        let pieces_per_box = || -> Result<Decimal, ConversionError> {
            if packaging.pieces_per_box > Decimal::ZERO {
                return Ok(packaging.pieces_per_box);
            }
            derived_pieces_per_box
                .filter(|r| *r > Decimal::ZERO)
                .ok_or(ConversionError::AmbiguousRatio { unit: Unit::Box })
        };

        // First leg: unit -> pieces.
        let pieces_per_unit = match unit {
            Unit::Piece => Decimal::ONE,
            Unit::Box => pieces_per_box()?,
            Unit::Pallet => {
                if packaging.boxes_per_pallet <= Decimal::ZERO {
                    return Err(ConversionError::AmbiguousRatio { unit: Unit::Pallet });
                }
                pieces_per_box()? * packaging.boxes_per_pallet
            }
            Unit::SquareMeter => {
                return Err(ConversionError::UnsupportedConversion {
                    from: unit,
                    to: packaging.stocking_unit,
                });
            }
        };

        // Second leg: pieces -> stocking unit.
        match packaging.stocking_unit {
            Unit::Piece => Ok(pieces_per_unit),
            Unit::SquareMeter => {
                let area = Self::area_per_piece(packaging)
                    .ok_or(ConversionError::MissingDimensions)?;
                Ok(pieces_per_unit * area)
            }
            Unit::Box | Unit::Pallet => Err(ConversionError::UnsupportedConversion {
                from: unit,
                to: packaging.stocking_unit,
            }),
        }
    }

    /// Returns the area in m² of one piece, derived from the product's
    /// dimension string (centimetres), or `None` if no dimensions parse.
    #[must_use]
    pub fn area_per_piece(packaging: &ProductPackaging) -> Option<Decimal> {
        let raw = packaging.dimensions.as_deref()?;
        let (w, h) = Self::parse_dimensions(raw)?;
        Some(w * h / Decimal::from(CM2_PER_M2))
    }

    /// Parses a `"WxH"` dimension string into centimetre values.
    ///
    /// Tolerant of `x`/`X`/`*`/`×` separators and surrounding text, so
    /// `"Grès Cérame 60x60 R"` and `"7.5*30"` both parse. A trailing third
    /// dimension (thickness) is ignored.
    #[must_use]
    pub fn parse_dimensions(raw: &str) -> Option<(Decimal, Decimal)> {
        for (idx, ch) in raw.char_indices() {
            if !DIMENSION_SEPARATORS.contains(&ch) {
                continue;
            }
            let left = trailing_number(&raw[..idx]);
            let right = leading_number(&raw[idx + ch.len_utf8()..]);
            if let (Some(w), Some(h)) = (left, right) {
                return Some((w, h));
            }
        }
        None
    }
}

/// Parses the numeric run ending at the end of `s`.
fn trailing_number(s: &str) -> Option<Decimal> {
    let trimmed = s.trim_end();
    let run: String = trimmed
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    parse_positive(&run)
}

/// Parses the numeric run starting at the beginning of `s`.
fn leading_number(s: &str) -> Option<Decimal> {
    let trimmed = s.trim_start();
    let run: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    parse_positive(&run)
}

fn parse_positive(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s).ok().filter(|d| *d > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn planar_60x60() -> ProductPackaging {
        ProductPackaging::planar("60x60", dec!(10), dec!(40))
    }

    #[test]
    fn test_parse_dimensions_plain() {
        assert_eq!(
            UnitService::parse_dimensions("60x60"),
            Some((dec!(60), dec!(60)))
        );
    }

    #[test]
    fn test_parse_dimensions_with_text() {
        assert_eq!(
            UnitService::parse_dimensions("Grès Cérame 60X120 Poli"),
            Some((dec!(60), dec!(120)))
        );
    }

    #[test]
    fn test_parse_dimensions_decimal_and_star() {
        assert_eq!(
            UnitService::parse_dimensions("7.5*30"),
            Some((dec!(7.5), dec!(30)))
        );
    }

    #[test]
    fn test_parse_dimensions_ignores_thickness() {
        assert_eq!(
            UnitService::parse_dimensions("60x60x2"),
            Some((dec!(60), dec!(60)))
        );
    }

    #[test]
    fn test_parse_dimensions_rejects_garbage() {
        assert_eq!(UnitService::parse_dimensions("grand format"), None);
        assert_eq!(UnitService::parse_dimensions("x60"), None);
        assert_eq!(UnitService::parse_dimensions(""), None);
    }

    #[test]
    fn test_area_per_piece() {
        assert_eq!(
            UnitService::area_per_piece(&planar_60x60()),
            Some(dec!(0.36))
        );
    }

    #[test]
    fn test_identity_conversion() {
        let result =
            UnitService::to_stocking_unit(&planar_60x60(), dec!(7.2), Unit::SquareMeter, None)
                .unwrap();
        assert_eq!(result, dec!(7.2));
    }

    #[test]
    fn test_piece_to_area() {
        let result =
            UnitService::to_stocking_unit(&planar_60x60(), dec!(10), Unit::Piece, None).unwrap();
        assert_eq!(result, dec!(3.6));
    }

    #[test]
    fn test_two_boxes_of_60x60_is_7_2_square_meters() {
        // 2 boxes * 10 pieces * 0.36 m² = 7.2 m²
        let result =
            UnitService::to_stocking_unit(&planar_60x60(), dec!(2), Unit::Box, None).unwrap();
        assert_eq!(result, dec!(7.2));
    }

    #[test]
    fn test_pallet_to_area() {
        // 1 pallet * 40 boxes * 10 pieces * 0.36 m² = 144 m²
        let result =
            UnitService::to_stocking_unit(&planar_60x60(), dec!(1), Unit::Pallet, None).unwrap();
        assert_eq!(result, dec!(144));
    }

    #[test]
    fn test_missing_box_ratio_is_ambiguous() {
        let packaging = ProductPackaging::planar("60x60", Decimal::ZERO, dec!(40));
        let result = UnitService::to_stocking_unit(&packaging, dec!(2), Unit::Box, None);
        assert_eq!(
            result,
            Err(ConversionError::AmbiguousRatio { unit: Unit::Box })
        );
    }

    #[test]
    fn test_derived_ratio_fallback() {
        let packaging = ProductPackaging::planar("60x60", Decimal::ZERO, dec!(40));
        let result =
            UnitService::to_stocking_unit(&packaging, dec!(2), Unit::Box, Some(dec!(10))).unwrap();
        assert_eq!(result, dec!(7.2));
    }

    #[test]
    fn test_explicit_ratio_beats_derived() {
        let packaging = ProductPackaging::planar("60x60", dec!(10), dec!(40));
        let result =
            UnitService::to_stocking_unit(&packaging, dec!(2), Unit::Box, Some(dec!(12))).unwrap();
        assert_eq!(result, dec!(7.2));
    }

    #[test]
    fn test_missing_pallet_ratio_is_ambiguous() {
        let packaging = ProductPackaging::planar("60x60", dec!(10), Decimal::ZERO);
        let result = UnitService::to_stocking_unit(&packaging, dec!(1), Unit::Pallet, None);
        assert_eq!(
            result,
            Err(ConversionError::AmbiguousRatio { unit: Unit::Pallet })
        );
    }

    #[test]
    fn test_planar_without_dimensions_fails() {
        let packaging = ProductPackaging {
            stocking_unit: Unit::SquareMeter,
            dimensions: None,
            pieces_per_box: dec!(10),
            boxes_per_pallet: dec!(40),
        };
        let result = UnitService::to_stocking_unit(&packaging, dec!(10), Unit::Piece, None);
        assert_eq!(result, Err(ConversionError::MissingDimensions));
    }

    #[test]
    fn test_piece_stocked_product() {
        let packaging = ProductPackaging::by_piece(dec!(25), dec!(48));
        let result =
            UnitService::to_stocking_unit(&packaging, dec!(3), Unit::Box, None).unwrap();
        assert_eq!(result, dec!(75));
    }

    #[test]
    fn test_area_sale_unit_on_piece_product_unsupported() {
        let packaging = ProductPackaging::by_piece(dec!(25), dec!(48));
        let result = UnitService::to_stocking_unit(&packaging, dec!(5), Unit::SquareMeter, None);
        assert_eq!(
            result,
            Err(ConversionError::UnsupportedConversion {
                from: Unit::SquareMeter,
                to: Unit::Piece,
            })
        );
    }

    #[test]
    fn test_non_positive_quantity() {
        let result = UnitService::to_stocking_unit(&planar_60x60(), dec!(0), Unit::Box, None);
        assert_eq!(result, Err(ConversionError::NonPositiveQuantity));
        let result = UnitService::to_stocking_unit(&planar_60x60(), dec!(-1), Unit::Box, None);
        assert_eq!(result, Err(ConversionError::NonPositiveQuantity));
    }

    #[test]
    fn test_from_stocking_unit_inverts_boxes() {
        let stock =
            UnitService::to_stocking_unit(&planar_60x60(), dec!(2), Unit::Box, None).unwrap();
        let boxes =
            UnitService::from_stocking_unit(&planar_60x60(), stock, Unit::Box, None).unwrap();
        assert_eq!(boxes, dec!(2));
    }
}
