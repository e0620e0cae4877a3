//! Pure stock-level operations.
//!
//! Every operation takes the current [`StockLevels`] and returns the new
//! levels (or an error) without touching storage. The repositories in
//! `tessera-db` lock the row, call one of these, persist the result, and
//! append the audit trail inside a single database transaction.

use rust_decimal::Decimal;

use tessera_shared::types::round_qty;

use crate::units::{ProductPackaging, Unit, UnitService};

use super::error::InventoryError;
use super::types::{DerivedCounts, StockLevels};

/// Stateless stock-level service.
pub struct StockService;

impl StockService {
    /// Places a reservation against available stock. Never touches on-hand.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InsufficientStock`] if the requested
    /// quantity exceeds `on_hand - reserved`.
    pub fn reserve(levels: StockLevels, quantity: Decimal) -> Result<StockLevels, InventoryError> {
        require_positive(quantity)?;
        let available = levels.available();
        if quantity > available {
            return Err(InventoryError::InsufficientStock {
                requested: quantity,
                available,
            });
        }
        Ok(StockLevels {
            reserved: round_qty(levels.reserved + quantity),
            ..levels
        })
    }

    /// Releases a reservation without moving stock. Clamped at zero so a
    /// double release cannot drive the reserved quantity negative.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive quantities.
    pub fn release(levels: StockLevels, quantity: Decimal) -> Result<StockLevels, InventoryError> {
        require_positive(quantity)?;
        Ok(StockLevels {
            reserved: clamp_zero(levels.reserved - quantity),
            ..levels
        })
    }

    /// Permanently deducts reserved stock at order confirmation.
    ///
    /// Both on-hand and reserved drop by the stocking-unit quantity, and
    /// the derived pallet/colis counts drop by the caller-supplied deltas.
    /// All four are clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive quantities.
    pub fn commit(
        levels: StockLevels,
        quantity: Decimal,
        pallet_delta: Decimal,
        colis_delta: Decimal,
    ) -> Result<StockLevels, InventoryError> {
        require_positive(quantity)?;
        Ok(StockLevels {
            on_hand: clamp_zero(levels.on_hand - quantity),
            reserved: clamp_zero(levels.reserved - quantity),
            pallet_count: clamp_zero(levels.pallet_count - pallet_delta),
            colis_count: clamp_zero(levels.colis_count - colis_delta),
        })
    }

    /// Increments on-hand stock (goods receipts, approved customer
    /// returns, order-edit reversal).
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive quantities.
    pub fn restock(levels: StockLevels, quantity: Decimal) -> Result<StockLevels, InventoryError> {
        require_positive(quantity)?;
        Ok(StockLevels {
            on_hand: round_qty(levels.on_hand + quantity),
            ..levels
        })
    }

    /// Deducts on-hand stock without a prior reservation (approved
    /// supplier returns). Unlike [`Self::commit`], this fails rather than
    /// clamps when stock is short.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InsufficientStock`] if `quantity` exceeds
    /// the on-hand amount.
    pub fn stock_out(
        levels: StockLevels,
        quantity: Decimal,
    ) -> Result<StockLevels, InventoryError> {
        require_positive(quantity)?;
        if quantity > levels.on_hand {
            return Err(InventoryError::InsufficientStock {
                requested: quantity,
                available: levels.on_hand,
            });
        }
        Ok(StockLevels {
            on_hand: round_qty(levels.on_hand - quantity),
            ..levels
        })
    }

    /// Applies a signed manual correction to on-hand stock.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NegativeOnHand`] if the result would be
    /// negative.
    pub fn adjust(levels: StockLevels, delta: Decimal) -> Result<StockLevels, InventoryError> {
        if delta.is_zero() {
            return Err(InventoryError::NonPositiveQuantity);
        }
        let on_hand = round_qty(levels.on_hand + delta);
        if on_hand < Decimal::ZERO {
            return Err(InventoryError::NegativeOnHand {
                on_hand: levels.on_hand,
                delta,
            });
        }
        Ok(StockLevels { on_hand, ..levels })
    }

    /// Recomputes the derived pallet/colis counts from the on-hand
    /// quantity and the product's packaging ratios, at 4-decimal precision.
    ///
    /// Returns `None` when the packaging ratios cannot express the
    /// on-hand quantity in boxes (missing ratio or dimensions); callers
    /// store zeros in that case.
    #[must_use]
    pub fn derived_counts(
        on_hand: Decimal,
        packaging: &ProductPackaging,
        derived_pieces_per_box: Option<Decimal>,
    ) -> Option<DerivedCounts> {
        let stock_per_box =
            UnitService::stocking_factor(packaging, Unit::Box, derived_pieces_per_box).ok()?;
        if stock_per_box <= Decimal::ZERO {
            return None;
        }
        let colis_count = round_qty(on_hand / stock_per_box);
        let pallet_count = if packaging.boxes_per_pallet > Decimal::ZERO {
            round_qty(colis_count / packaging.boxes_per_pallet)
        } else {
            Decimal::ZERO
        };
        Some(DerivedCounts {
            pallet_count,
            colis_count,
        })
    }
}

fn require_positive(quantity: Decimal) -> Result<(), InventoryError> {
    if quantity <= Decimal::ZERO {
        return Err(InventoryError::NonPositiveQuantity);
    }
    Ok(())
}

fn clamp_zero(value: Decimal) -> Decimal {
    round_qty(value.max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn levels(on_hand: Decimal, reserved: Decimal) -> StockLevels {
        StockLevels {
            on_hand,
            reserved,
            pallet_count: dec!(2),
            colis_count: dec!(20),
        }
    }

    #[test]
    fn test_reserve_within_availability() {
        let after = StockService::reserve(levels(dec!(10), dec!(2)), dec!(7.2)).unwrap();
        assert_eq!(after.reserved, dec!(9.2));
        assert_eq!(after.on_hand, dec!(10)); // untouched
    }

    #[test]
    fn test_reserve_rejects_oversubscription() {
        let result = StockService::reserve(levels(dec!(10), dec!(4)), dec!(6.5));
        assert_eq!(
            result,
            Err(InventoryError::InsufficientStock {
                requested: dec!(6.5),
                available: dec!(6),
            })
        );
    }

    #[test]
    fn test_reserve_exact_availability_succeeds() {
        let after = StockService::reserve(levels(dec!(10), dec!(4)), dec!(6)).unwrap();
        assert_eq!(after.reserved, dec!(10));
    }

    #[test]
    fn test_release_clamps_at_zero() {
        let after = StockService::release(levels(dec!(10), dec!(3)), dec!(5)).unwrap();
        assert_eq!(after.reserved, dec!(0));
        assert_eq!(after.on_hand, dec!(10));
    }

    #[test]
    fn test_commit_deducts_on_hand_and_reserved() {
        let after =
            StockService::commit(levels(dec!(10), dec!(7.2)), dec!(7.2), dec!(0.5), dec!(2))
                .unwrap();
        assert_eq!(after.on_hand, dec!(2.8));
        assert_eq!(after.reserved, dec!(0));
        assert_eq!(after.pallet_count, dec!(1.5));
        assert_eq!(after.colis_count, dec!(18));
    }

    #[test]
    fn test_commit_clamps_everything_at_zero() {
        let after = StockService::commit(levels(dec!(5), dec!(1)), dec!(6), dec!(3), dec!(25))
            .unwrap();
        assert_eq!(after.on_hand, dec!(0));
        assert_eq!(after.reserved, dec!(0));
        assert_eq!(after.pallet_count, dec!(0));
        assert_eq!(after.colis_count, dec!(0));
    }

    #[test]
    fn test_restock() {
        let after = StockService::restock(levels(dec!(2.8), dec!(0)), dec!(7.2)).unwrap();
        assert_eq!(after.on_hand, dec!(10));
    }

    #[test]
    fn test_stock_out_fails_on_short_stock() {
        let result = StockService::stock_out(levels(dec!(5), dec!(0)), dec!(6));
        assert_eq!(
            result,
            Err(InventoryError::InsufficientStock {
                requested: dec!(6),
                available: dec!(5),
            })
        );
    }

    #[test]
    fn test_adjust_rejects_negative_result() {
        let result = StockService::adjust(levels(dec!(5), dec!(0)), dec!(-6));
        assert_eq!(
            result,
            Err(InventoryError::NegativeOnHand {
                on_hand: dec!(5),
                delta: dec!(-6),
            })
        );
    }

    #[test]
    fn test_adjust_applies_signed_delta() {
        let after = StockService::adjust(levels(dec!(5), dec!(0)), dec!(-2.5)).unwrap();
        assert_eq!(after.on_hand, dec!(2.5));
        let after = StockService::adjust(after, dec!(10)).unwrap();
        assert_eq!(after.on_hand, dec!(12.5));
    }

    #[test]
    fn test_zero_quantity_rejected_everywhere() {
        let l = levels(dec!(5), dec!(0));
        assert!(StockService::reserve(l, dec!(0)).is_err());
        assert!(StockService::release(l, dec!(0)).is_err());
        assert!(StockService::commit(l, dec!(0), dec!(0), dec!(0)).is_err());
        assert!(StockService::restock(l, dec!(0)).is_err());
        assert!(StockService::stock_out(l, dec!(0)).is_err());
        assert!(StockService::adjust(l, dec!(0)).is_err());
    }

    #[test]
    fn test_derived_counts_for_planar_product() {
        // 7.2 m² on hand, 10 pieces of 0.36 m² per box -> 2 boxes, 40
        // boxes per pallet -> 0.05 pallets.
        let packaging = crate::units::ProductPackaging::planar("60x60", dec!(10), dec!(40));
        let counts = StockService::derived_counts(dec!(7.2), &packaging, None).unwrap();
        assert_eq!(counts.colis_count, dec!(2));
        assert_eq!(counts.pallet_count, dec!(0.05));
    }

    #[test]
    fn test_derived_counts_missing_ratio() {
        let packaging =
            crate::units::ProductPackaging::planar("60x60", Decimal::ZERO, Decimal::ZERO);
        assert_eq!(StockService::derived_counts(dec!(7.2), &packaging, None), None);
    }
}
