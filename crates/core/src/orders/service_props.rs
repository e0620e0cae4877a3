//! Property-based tests for order transitions and totals.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::reversal::{ItemSnapshot, ReversalAction, ReversalPlan};
use super::service::OrderService;
use super::types::{LineAmounts, OrderStatus};
use uuid::Uuid;

const ALL_STATUSES: [OrderStatus; 6] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
];

fn any_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(ALL_STATUSES.as_slice())
}

fn any_line() -> impl Strategy<Value = LineAmounts> {
    (1u64..=100_000, 1u64..=1_000_000, 0u64..=100).prop_map(|(qty, price, disc)| LineAmounts {
        quantity: Decimal::new(qty as i64, 2),
        unit_price: Decimal::new(price as i64, 2),
        discount_pct: Decimal::from(disc),
    })
}

proptest! {
    /// validate_transition agrees with the transition table exactly.
    #[test]
    fn prop_transition_matches_table(from in any_status(), to in any_status()) {
        let allowed = from.can_transition(to);
        prop_assert_eq!(OrderService::validate_transition(from, to).is_ok(), allowed);
    }

    /// No status can transition to itself or back to pending.
    #[test]
    fn prop_no_self_or_backward_transitions(status in any_status()) {
        prop_assert!(!status.can_transition(status));
        prop_assert!(!status.can_transition(OrderStatus::Pending));
    }

    /// Cancelled and Delivered are terminal.
    #[test]
    fn prop_terminal_statuses(to in any_status()) {
        prop_assert!(!OrderStatus::Cancelled.can_transition(to));
        prop_assert!(!OrderStatus::Delivered.can_transition(to));
    }

    /// Totals are non-negative, 2-decimal, and monotone in line count.
    #[test]
    fn prop_totals_accumulate(lines in prop::collection::vec(any_line(), 0..8)) {
        let total = OrderService::compute_totals(&lines).total_amount;
        prop_assert!(total >= Decimal::ZERO);
        prop_assert!(total.scale() <= 2);

        let partial = OrderService::compute_totals(&lines[..lines.len() / 2]).total_amount;
        prop_assert!(partial <= total);
    }

    /// The reversal action kind depends only on committed-stock status,
    /// and the plan always covers every item.
    #[test]
    fn prop_reversal_covers_all_items(
        status in any_status().prop_filter("not cancelled", |s| *s != OrderStatus::Cancelled),
        quantities in prop::collection::vec(1u64..=100_000, 1..6),
    ) {
        let items: Vec<ItemSnapshot> = quantities
            .iter()
            .map(|&q| ItemSnapshot {
                product_id: Uuid::now_v7(),
                quantity_stock_unit: Decimal::new(q as i64, 2),
                pallet_count: Decimal::ZERO,
                colis_count: Decimal::ZERO,
            })
            .collect();

        let plan = ReversalPlan::for_order(status, &items).unwrap();
        prop_assert_eq!(plan.stock.len(), items.len());
        prop_assert_eq!(plan.reverse_cash, status.has_committed_stock());
        for (step, item) in plan.stock.iter().zip(&items) {
            let quantity = match step.action {
                ReversalAction::Release { quantity } => quantity,
                ReversalAction::Restock { quantity, .. } => quantity,
            };
            prop_assert_eq!(quantity, item.quantity_stock_unit);
            prop_assert_eq!(
                matches!(step.action, ReversalAction::Restock { .. }),
                status.has_committed_stock()
            );
        }
    }
}
