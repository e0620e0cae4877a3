//! Inventory domain types.

use rust_decimal::Decimal;

/// The mutable quantities of one inventory record.
///
/// `available` is always computed as `on_hand - reserved`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StockLevels {
    /// Physical quantity in the stocking unit.
    pub on_hand: Decimal,
    /// Quantity held by pending-order reservations.
    pub reserved: Decimal,
    /// Derived pallet count.
    pub pallet_count: Decimal,
    /// Derived box (colis) count.
    pub colis_count: Decimal,
}

impl StockLevels {
    /// Quantity available for new reservations.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.on_hand - self.reserved
    }
}

/// Pallet and colis counts derived from on-hand stock and packaging ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedCounts {
    /// Pallets represented by the on-hand quantity.
    pub pallet_count: Decimal,
    /// Boxes represented by the on-hand quantity.
    pub colis_count: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_available_is_computed() {
        let levels = StockLevels {
            on_hand: dec!(10),
            reserved: dec!(3.5),
            ..StockLevels::default()
        };
        assert_eq!(levels.available(), dec!(6.5));
    }
}
