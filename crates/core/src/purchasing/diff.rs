//! Item-list diffing for purchase order edits.
//!
//! Editing a purchase order that has already moved stock must keep
//! the inventory ledger in step with the new item list. Lines are
//! matched by item id; a line whose (product, warehouse) key is
//! unchanged gets one signed delta, while a line whose key changed is
//! reversed under the old key and re-applied under the new one. A
//! delta is never computed across two different keys.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::PurchasingError;

/// The inventory-record key a purchase order line points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    /// Product being purchased.
    pub product_id: Uuid,
    /// Destination warehouse.
    pub warehouse_id: Uuid,
}

/// One purchase order line as seen by the diff.
///
/// Quantities are already converted to the product's stocking unit;
/// the repository does the conversion before planning.
#[derive(Debug, Clone, Copy)]
pub struct ItemLine {
    /// Row id; `None` for lines being added by the edit.
    pub item_id: Option<Uuid>,
    /// Product/warehouse key.
    pub key: ItemKey,
    /// Ordered quantity in the stocking unit.
    pub stock_quantity: Decimal,
    /// Quantity already received against this line, purchase unit.
    pub received_quantity: Decimal,
}

/// One ledger adjustment produced by the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// Apply a signed stocking-unit delta to an unchanged key.
    Delta {
        /// Inventory record to adjust.
        key: ItemKey,
        /// New minus old quantity; negative deltas take stock back out.
        delta: Decimal,
    },
    /// Take the old line's stock back out under its old key.
    Reverse {
        /// Old inventory record.
        key: ItemKey,
        /// Quantity to remove.
        quantity: Decimal,
    },
    /// Put the new line's stock in under its new key.
    Apply {
        /// New inventory record.
        key: ItemKey,
        /// Quantity to add.
        quantity: Decimal,
    },
}

/// The planned ledger effect of a purchase order edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoDiff {
    /// Ledger adjustments, in application order.
    pub changes: Vec<LineChange>,
}

impl PoDiff {
    /// Diffs the old item list against the new one.
    ///
    /// `moved_stock` says whether the order has moved any stock yet;
    /// pending orders produce no ledger changes, only row rewrites.
    /// Removing a line that has receipts is refused in either case.
    pub fn compute(
        old: &[ItemLine],
        new: &[ItemLine],
        moved_stock: bool,
    ) -> Result<Self, PurchasingError> {
        let mut changes = Vec::new();

        for old_line in old {
            let old_id = old_line
                .item_id
                .ok_or(PurchasingError::UnknownItem(Uuid::nil()))?;
            let counterpart = new.iter().find(|n| n.item_id == Some(old_id));

            match counterpart {
                None => {
                    if old_line.received_quantity > Decimal::ZERO {
                        return Err(PurchasingError::ReferentialConflict(old_id));
                    }
                    if moved_stock {
                        changes.push(LineChange::Reverse {
                            key: old_line.key,
                            quantity: old_line.stock_quantity,
                        });
                    }
                }
                Some(new_line) if !moved_stock => {
                    let _ = new_line;
                }
                Some(new_line) if new_line.key == old_line.key => {
                    let delta = new_line.stock_quantity - old_line.stock_quantity;
                    if delta != Decimal::ZERO {
                        changes.push(LineChange::Delta {
                            key: old_line.key,
                            delta,
                        });
                    }
                }
                Some(new_line) => {
                    changes.push(LineChange::Reverse {
                        key: old_line.key,
                        quantity: old_line.stock_quantity,
                    });
                    changes.push(LineChange::Apply {
                        key: new_line.key,
                        quantity: new_line.stock_quantity,
                    });
                }
            }
        }

        if moved_stock {
            for new_line in new.iter().filter(|n| n.item_id.is_none()) {
                changes.push(LineChange::Apply {
                    key: new_line.key,
                    quantity: new_line.stock_quantity,
                });
            }
        }

        Ok(Self { changes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn key() -> ItemKey {
        ItemKey {
            product_id: Uuid::now_v7(),
            warehouse_id: Uuid::now_v7(),
        }
    }

    fn line(id: Option<Uuid>, key: ItemKey, qty: Decimal, received: Decimal) -> ItemLine {
        ItemLine {
            item_id: id,
            key,
            stock_quantity: qty,
            received_quantity: received,
        }
    }

    #[test]
    fn test_same_key_produces_signed_delta() {
        let id = Uuid::now_v7();
        let k = key();
        let old = vec![line(Some(id), k, dec!(100), dec!(100))];
        let new = vec![line(Some(id), k, dec!(80), dec!(100))];

        let diff = PoDiff::compute(&old, &new, true).unwrap();
        assert_eq!(
            diff.changes,
            vec![LineChange::Delta {
                key: k,
                delta: dec!(-20)
            }]
        );
    }

    #[test]
    fn test_changed_key_reverses_then_applies() {
        let id = Uuid::now_v7();
        let old_key = key();
        let new_key = key();
        let old = vec![line(Some(id), old_key, dec!(50), dec!(50))];
        let new = vec![line(Some(id), new_key, dec!(50), dec!(50))];

        let diff = PoDiff::compute(&old, &new, true).unwrap();
        assert_eq!(
            diff.changes,
            vec![
                LineChange::Reverse {
                    key: old_key,
                    quantity: dec!(50)
                },
                LineChange::Apply {
                    key: new_key,
                    quantity: dec!(50)
                },
            ]
        );
    }

    #[test]
    fn test_removing_received_line_conflicts() {
        let id = Uuid::now_v7();
        let old = vec![line(Some(id), key(), dec!(50), dec!(10))];

        let result = PoDiff::compute(&old, &[], true);
        assert_eq!(result, Err(PurchasingError::ReferentialConflict(id)));
    }

    #[test]
    fn test_pending_order_produces_no_ledger_changes() {
        let id = Uuid::now_v7();
        let k = key();
        let old = vec![line(Some(id), k, dec!(100), dec!(0))];
        let new = vec![
            line(Some(id), k, dec!(40), dec!(0)),
            line(None, key(), dec!(60), dec!(0)),
        ];

        let diff = PoDiff::compute(&old, &new, false).unwrap();
        assert!(diff.changes.is_empty());
    }

    #[test]
    fn test_added_line_applies_when_stock_moved() {
        let k = key();
        let new = vec![line(None, k, dec!(25), dec!(0))];

        let diff = PoDiff::compute(&[], &new, true).unwrap();
        assert_eq!(
            diff.changes,
            vec![LineChange::Apply {
                key: k,
                quantity: dec!(25)
            }]
        );
    }

    #[test]
    fn test_unchanged_line_is_a_noop() {
        let id = Uuid::now_v7();
        let k = key();
        let items = vec![line(Some(id), k, dec!(100), dec!(100))];

        let diff = PoDiff::compute(&items, &items, true).unwrap();
        assert!(diff.changes.is_empty());
    }
}
