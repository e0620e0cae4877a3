//! Property-based tests for stock-level operations.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::StockService;
use super::types::StockLevels;

/// Strategy for stocking-unit quantities (0.0001 to 100,000.0000).
fn qty() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn levels() -> impl Strategy<Value = StockLevels> {
    (qty(), qty()).prop_map(|(on_hand, reserved)| StockLevels {
        on_hand,
        reserved: reserved.min(on_hand),
        pallet_count: Decimal::ZERO,
        colis_count: Decimal::ZERO,
    })
}

proptest! {
    // The `prop_assume!` guards reject most generated inputs, so the
    // default global-reject cap (1024) makes these tests flaky at 200
    // cases; raise it so rejection exhaustion cannot abort a run.
    #![proptest_config(ProptestConfig {
        cases: 200,
        max_global_rejects: 1_000_000,
        ..ProptestConfig::default()
    })]

    /// Conservation: for any valid reserve/commit pair, on-hand drops by
    /// exactly the committed quantity and reserved never goes negative.
    #[test]
    fn prop_reserve_commit_conserves_on_hand(
        start in levels(),
        request in qty(),
    ) {
        prop_assume!(request <= start.available());

        let reserved = StockService::reserve(start, request).unwrap();
        let committed =
            StockService::commit(reserved, request, Decimal::ZERO, Decimal::ZERO).unwrap();

        prop_assert_eq!(committed.on_hand, start.on_hand - request);
        prop_assert!(committed.reserved >= Decimal::ZERO);
        prop_assert_eq!(committed.reserved, start.reserved);
    }

    /// Reserve then release is the identity on stock levels.
    #[test]
    fn prop_reserve_release_roundtrip(
        start in levels(),
        request in qty(),
    ) {
        prop_assume!(request <= start.available());

        let reserved = StockService::reserve(start, request).unwrap();
        let released = StockService::release(reserved, request).unwrap();

        prop_assert_eq!(released, start);
    }

    /// Reserve never succeeds beyond availability, and never moves on-hand.
    #[test]
    fn prop_reserve_respects_availability(
        start in levels(),
        request in qty(),
    ) {
        match StockService::reserve(start, request) {
            Ok(after) => {
                prop_assert!(request <= start.available());
                prop_assert_eq!(after.on_hand, start.on_hand);
            }
            Err(_) => prop_assert!(request > start.available()),
        }
    }

    /// Commit and restock of the same quantity restore on-hand exactly
    /// (the reverse-then-reapply edit path relies on this).
    #[test]
    fn prop_commit_restock_restores_on_hand(
        start in levels(),
        request in qty(),
    ) {
        prop_assume!(request <= start.available());

        let reserved = StockService::reserve(start, request).unwrap();
        let committed =
            StockService::commit(reserved, request, Decimal::ZERO, Decimal::ZERO).unwrap();
        let restored = StockService::restock(committed, request).unwrap();

        prop_assert_eq!(restored.on_hand, start.on_hand);
    }

    /// Reserved and on-hand quantities are never negative after any
    /// sequence of clamped operations.
    #[test]
    fn prop_clamped_ops_never_negative(
        start in levels(),
        a in qty(),
        b in qty(),
    ) {
        let released = StockService::release(start, a).unwrap();
        let committed = StockService::commit(released, b, a, b).unwrap();

        prop_assert!(released.reserved >= Decimal::ZERO);
        prop_assert!(committed.on_hand >= Decimal::ZERO);
        prop_assert!(committed.reserved >= Decimal::ZERO);
        prop_assert!(committed.pallet_count >= Decimal::ZERO);
        prop_assert!(committed.colis_count >= Decimal::ZERO);
    }
}
