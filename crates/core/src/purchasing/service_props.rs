//! Property-based tests for purchase order status derivation and diffing.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::diff::{ItemKey, ItemLine, LineChange, PoDiff};
use super::service::{ItemState, PurchaseService};
use super::types::PurchaseOrderStatus;

fn any_item() -> impl Strategy<Value = ItemState> {
    (1u64..=10_000u64, 0u64..=10_000u64).prop_map(|(qty, received)| ItemState {
        item_id: Uuid::now_v7(),
        quantity: Decimal::from(qty),
        received_quantity: Decimal::from(received.min(qty)),
    })
}

proptest! {
    /// Derived status is consistent with the received/ordered totals.
    #[test]
    fn prop_derived_status_matches_totals(items in prop::collection::vec(any_item(), 1..6)) {
        let ordered: Decimal = items.iter().map(|i| i.quantity).sum();
        let received: Decimal = items.iter().map(|i| i.received_quantity).sum();
        let status = PurchaseService::derive_status(&items);

        match status {
            PurchaseOrderStatus::Pending => prop_assert_eq!(received, Decimal::ZERO),
            PurchaseOrderStatus::Partial => {
                prop_assert!(received > Decimal::ZERO && received < ordered);
            }
            PurchaseOrderStatus::Received => prop_assert!(received >= ordered),
            PurchaseOrderStatus::Cancelled => prop_assert!(false, "never derived"),
        }
    }

    /// A diff of a list against itself is always empty.
    #[test]
    fn prop_self_diff_is_empty(
        quantities in prop::collection::vec(1u64..=10_000, 1..6),
        moved in any::<bool>(),
    ) {
        let items: Vec<ItemLine> = quantities
            .iter()
            .map(|&q| ItemLine {
                item_id: Some(Uuid::now_v7()),
                key: ItemKey {
                    product_id: Uuid::now_v7(),
                    warehouse_id: Uuid::now_v7(),
                },
                stock_quantity: Decimal::from(q),
                received_quantity: Decimal::ZERO,
            })
            .collect();

        let diff = PoDiff::compute(&items, &items, moved).unwrap();
        prop_assert!(diff.changes.is_empty());
    }

    /// Quantity edits on unchanged keys always net out: the sum of the
    /// deltas equals the difference of the list totals.
    #[test]
    fn prop_deltas_net_to_total_difference(
        pairs in prop::collection::vec((1u64..=10_000, 1u64..=10_000), 1..6),
    ) {
        let lines: Vec<(ItemLine, ItemLine)> = pairs
            .iter()
            .map(|&(old_q, new_q)| {
                let id = Some(Uuid::now_v7());
                let key = ItemKey {
                    product_id: Uuid::now_v7(),
                    warehouse_id: Uuid::now_v7(),
                };
                let base = ItemLine {
                    item_id: id,
                    key,
                    stock_quantity: Decimal::from(old_q),
                    received_quantity: Decimal::ZERO,
                };
                let edited = ItemLine {
                    stock_quantity: Decimal::from(new_q),
                    ..base
                };
                (base, edited)
            })
            .collect();
        let old: Vec<ItemLine> = lines.iter().map(|(o, _)| *o).collect();
        let new: Vec<ItemLine> = lines.iter().map(|(_, n)| *n).collect();

        let diff = PoDiff::compute(&old, &new, true).unwrap();
        let net: Decimal = diff
            .changes
            .iter()
            .map(|c| match c {
                LineChange::Delta { delta, .. } => *delta,
                LineChange::Apply { quantity, .. } => *quantity,
                LineChange::Reverse { quantity, .. } => -*quantity,
            })
            .sum();
        let expected: Decimal = new.iter().map(|l| l.stock_quantity).sum::<Decimal>()
            - old.iter().map(|l| l.stock_quantity).sum::<Decimal>();
        prop_assert_eq!(net, expected);
    }
}
