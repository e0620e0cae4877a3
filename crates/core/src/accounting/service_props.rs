//! Property-based tests for the ledger sign convention.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::AccountingService;
use super::types::{CashTransactionKind, CounterpartyKind};

const ALL_KINDS: [CashTransactionKind; 6] = [
    CashTransactionKind::Vente,
    CashTransactionKind::Achat,
    CashTransactionKind::Versement,
    CashTransactionKind::Paiement,
    CashTransactionKind::RetourVente,
    CashTransactionKind::RetourAchat,
];

fn any_kind() -> impl Strategy<Value = CashTransactionKind> {
    prop::sample::select(ALL_KINDS.as_slice())
}

fn any_amount() -> impl Strategy<Value = Decimal> {
    (1u64..=100_000_000).prop_map(|cents| Decimal::new(cents as i64, 2))
}

proptest! {
    /// The sign is a function of the kind alone.
    #[test]
    fn prop_sign_depends_only_on_kind(kind in any_kind(), amount in any_amount()) {
        let signed = AccountingService::signed_amount(kind, amount);
        let raising = matches!(kind, CashTransactionKind::Vente | CashTransactionKind::Achat);
        prop_assert_eq!(signed > Decimal::ZERO, raising);
        prop_assert_eq!(signed.abs(), amount);
    }

    /// Applying a delta and then its negation restores any balance.
    #[test]
    fn prop_reversal_is_exact(kind in any_kind(), amount in any_amount(), start in any_amount()) {
        let delta = AccountingService::balance_delta(kind, amount);
        prop_assert_eq!(start + delta - delta, start);
    }

    /// A sale and a same-amount payment cancel on a customer balance;
    /// a purchase and a same-amount payment cancel on a supplier one.
    #[test]
    fn prop_settlement_nets_to_zero(amount in any_amount()) {
        let customer = AccountingService::balance_delta(CashTransactionKind::Vente, amount)
            + AccountingService::balance_delta(CashTransactionKind::Versement, amount);
        let supplier = AccountingService::balance_delta(CashTransactionKind::Achat, amount)
            + AccountingService::balance_delta(CashTransactionKind::Paiement, amount);
        prop_assert_eq!(customer, Decimal::ZERO);
        prop_assert_eq!(supplier, Decimal::ZERO);
    }

    /// Every kind maps to exactly one counterparty side.
    #[test]
    fn prop_counterparty_partition(kind in any_kind()) {
        let side = kind.counterparty();
        let customer_kinds = [
            CashTransactionKind::Vente,
            CashTransactionKind::Versement,
            CashTransactionKind::RetourVente,
        ];
        prop_assert_eq!(side == CounterpartyKind::Customer, customer_kinds.contains(&kind));
    }
}
