//! Reversal planning for order edits and cancellations.
//!
//! Editing or cancelling an order must undo its prior side effects
//! exactly. What those side effects were depends on the status at the
//! time: a pending order only holds reservations, while a confirmed
//! (or later) order has deducted on-hand stock and produced accounting
//! entries. The plan is computed here, purely, and executed by the
//! repository inside one database transaction.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::OrderError;
use super::types::OrderStatus;

/// The stock-relevant fields of one order line, captured at planning time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSnapshot {
    /// Product the line refers to.
    pub product_id: Uuid,
    /// Line quantity converted to the product's stocking unit.
    pub quantity_stock_unit: Decimal,
    /// Pallet-equivalent of the line, for packaging counters.
    pub pallet_count: Decimal,
    /// Box-equivalent of the line, for packaging counters.
    pub colis_count: Decimal,
}

/// A single stock movement needed to undo one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReversalAction {
    /// Drop a reservation; on-hand is untouched.
    Release {
        /// Quantity to release, in the stocking unit.
        quantity: Decimal,
    },
    /// Put committed stock back on hand, including packaging counters.
    Restock {
        /// Quantity to return to on-hand, in the stocking unit.
        quantity: Decimal,
        /// Pallet counter to restore.
        pallet_count: Decimal,
        /// Box counter to restore.
        colis_count: Decimal,
    },
}

/// One per-product reversal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockReversal {
    /// Product whose inventory record the action applies to.
    pub product_id: Uuid,
    /// The action to take.
    pub action: ReversalAction,
}

/// The full set of steps to undo an order's side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalPlan {
    /// Per-line stock movements.
    pub stock: Vec<StockReversal>,
    /// Whether accounting entries exist and must be reversed,
    /// including any wholesale balance delta they carried.
    pub reverse_cash: bool,
}

impl ReversalPlan {
    /// Builds the plan for an order currently in `status`.
    ///
    /// Pending orders get their reservations released; statuses with
    /// committed stock get restocked and their cash entries flagged
    /// for reversal. Cancelled orders have nothing left to reverse
    /// and editing them is an error.
    pub fn for_order(status: OrderStatus, items: &[ItemSnapshot]) -> Result<Self, OrderError> {
        if status == OrderStatus::Cancelled {
            return Err(OrderError::CannotEditCancelled);
        }
        let stock = items
            .iter()
            .map(|item| StockReversal {
                product_id: item.product_id,
                action: if status.has_committed_stock() {
                    ReversalAction::Restock {
                        quantity: item.quantity_stock_unit,
                        pallet_count: item.pallet_count,
                        colis_count: item.colis_count,
                    }
                } else {
                    ReversalAction::Release {
                        quantity: item.quantity_stock_unit,
                    }
                },
            })
            .collect();
        Ok(Self {
            stock,
            reverse_cash: status.has_committed_stock(),
        })
    }

    /// Returns true if the plan does nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stock.is_empty() && !self.reverse_cash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(qty: Decimal, pallets: Decimal, colis: Decimal) -> ItemSnapshot {
        ItemSnapshot {
            product_id: Uuid::now_v7(),
            quantity_stock_unit: qty,
            pallet_count: pallets,
            colis_count: colis,
        }
    }

    #[test]
    fn test_pending_order_releases_reservations() {
        let items = vec![item(dec!(7.2), dec!(0.1), dec!(2))];
        let plan = ReversalPlan::for_order(OrderStatus::Pending, &items).unwrap();

        assert!(!plan.reverse_cash);
        assert_eq!(plan.stock.len(), 1);
        assert_eq!(
            plan.stock[0].action,
            ReversalAction::Release {
                quantity: dec!(7.2)
            }
        );
    }

    #[test]
    fn test_confirmed_order_restocks_and_reverses_cash() {
        let items = vec![item(dec!(7.2), dec!(0.1), dec!(2)), item(dec!(50), dec!(1), dec!(20))];
        let plan = ReversalPlan::for_order(OrderStatus::Confirmed, &items).unwrap();

        assert!(plan.reverse_cash);
        assert_eq!(plan.stock.len(), 2);
        assert_eq!(
            plan.stock[0].action,
            ReversalAction::Restock {
                quantity: dec!(7.2),
                pallet_count: dec!(0.1),
                colis_count: dec!(2),
            }
        );
    }

    #[test]
    fn test_shipped_order_still_restocks() {
        let items = vec![item(dec!(10), dec!(0), dec!(0))];
        let plan = ReversalPlan::for_order(OrderStatus::Shipped, &items).unwrap();
        assert!(plan.reverse_cash);
        assert!(matches!(
            plan.stock[0].action,
            ReversalAction::Restock { .. }
        ));
    }

    #[test]
    fn test_cancelled_order_cannot_be_reversed() {
        let result = ReversalPlan::for_order(OrderStatus::Cancelled, &[]);
        assert_eq!(result, Err(OrderError::CannotEditCancelled));
    }

    #[test]
    fn test_empty_pending_plan_is_empty() {
        let plan = ReversalPlan::for_order(OrderStatus::Pending, &[]).unwrap();
        assert!(plan.is_empty());
    }
}
