//! Rounding helpers for stock quantities and money.
//!
//! CRITICAL: Never use floating-point for quantities or money.
//! All amounts are `rust_decimal::Decimal`, rounded half-even (banker's
//! rounding) at every derivation boundary to minimize cumulative errors.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places for stock quantities (stocking-unit amounts, pallet and
/// colis counts).
pub const QTY_DP: u32 = 4;

/// Decimal places for monetary amounts.
pub const MONEY_DP: u32 = 2;

/// Rounds a stock quantity to 4 decimal places, half to even.
#[must_use]
pub fn round_qty(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(QTY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Rounds a monetary amount to 2 decimal places, half to even.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_qty() {
        assert_eq!(round_qty(dec!(7.19999)), dec!(7.2));
        assert_eq!(round_qty(dec!(0.00005)), dec!(0.0000)); // half to even
        assert_eq!(round_qty(dec!(0.00015)), dec!(0.0002));
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.00)); // half to even
        assert_eq!(round_money(dec!(10.015)), dec!(10.02));
        assert_eq!(round_money(dec!(10000)), dec!(10000));
    }

    #[test]
    fn test_round_qty_is_idempotent() {
        let v = round_qty(dec!(1.23456789));
        assert_eq!(round_qty(v), v);
    }
}
