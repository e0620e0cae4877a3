//! Property-based tests for unit conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::UnitService;
use super::types::{ProductPackaging, Unit};

/// Strategy for piece counts (1 to 10,000 whole pieces).
fn piece_count() -> impl Strategy<Value = Decimal> {
    (1i64..10_000i64).prop_map(Decimal::from)
}

/// Strategy for tile edge lengths in centimetres (20.0 to 120.0, one decimal).
fn edge_cm() -> impl Strategy<Value = Decimal> {
    (200i64..1_200i64).prop_map(|v| Decimal::new(v, 1))
}

/// Strategy for packaging ratios (1 to 100).
fn ratio() -> impl Strategy<Value = Decimal> {
    (1i64..100i64).prop_map(Decimal::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converting N pieces to area and back recovers N within one
    /// ten-thousandth per piece (4-decimal rounding applies at each hop).
    #[test]
    fn prop_piece_area_conversion_inverts(
        pieces in piece_count(),
        w in edge_cm(),
        h in edge_cm(),
    ) {
        let packaging = ProductPackaging::planar(
            format!("{w}x{h}"),
            Decimal::from(10),
            Decimal::from(40),
        );

        let area = UnitService::to_stocking_unit(&packaging, pieces, Unit::Piece, None).unwrap();
        let recovered =
            UnitService::from_stocking_unit(&packaging, area, Unit::Piece, None).unwrap();

        // The area is rounded to 4 dp before inverting; with tile areas of
        // at least 0.04 m² per piece that bounds the drift well under 0.01.
        let tolerance = Decimal::new(1, 2);
        prop_assert!(
            (recovered - pieces).abs() <= tolerance,
            "expected {pieces}, recovered {recovered}"
        );
    }

    /// Conversion results always carry at most 4 decimal places.
    #[test]
    fn prop_conversion_rounds_to_4_decimals(
        boxes in piece_count(),
        ppb in ratio(),
        w in edge_cm(),
        h in edge_cm(),
    ) {
        let packaging =
            ProductPackaging::planar(format!("{w}x{h}"), ppb, Decimal::from(40));
        let stock = UnitService::to_stocking_unit(&packaging, boxes, Unit::Box, None).unwrap();

        let scaled = stock * Decimal::from(10_000);
        prop_assert_eq!(scaled.round(), scaled, "result {} exceeds 4 dp", stock);
    }

    /// Box and pallet conversions agree: one pallet equals boxes_per_pallet
    /// boxes.
    #[test]
    fn prop_pallet_equals_boxes(
        ppb in ratio(),
        bpp in ratio(),
        w in edge_cm(),
        h in edge_cm(),
    ) {
        let packaging = ProductPackaging::planar(format!("{w}x{h}"), ppb, bpp);

        let one_pallet =
            UnitService::to_stocking_unit(&packaging, Decimal::ONE, Unit::Pallet, None).unwrap();
        let as_boxes =
            UnitService::to_stocking_unit(&packaging, bpp, Unit::Box, None).unwrap();

        // Both paths round once at the end, so they may differ by at most
        // one ulp of the 4-decimal grid.
        let diff = (one_pallet - as_boxes).abs();
        prop_assert!(diff <= Decimal::new(1, 4), "pallet {one_pallet} vs boxes {as_boxes}");
    }
}
