//! The ledger sign convention.
//!
//! Balances are "what the counterparty owes us" for customers and
//! "what we owe them" for suppliers. Sales and purchases push the
//! balance up; payments and return credits bring it down.

use rust_decimal::Decimal;

use tessera_shared::types::quantity::round_money;

use super::error::AccountingError;
use super::types::CashTransactionKind;

/// Stateless ledger calculation service.
pub struct AccountingService;

impl AccountingService {
    /// Validates an amount before it enters the ledger.
    pub fn validate_amount(amount: Decimal) -> Result<(), AccountingError> {
        if amount <= Decimal::ZERO {
            return Err(AccountingError::NonPositiveAmount(amount));
        }
        Ok(())
    }

    /// The signed value stored on the cash row.
    #[must_use]
    pub fn signed_amount(kind: CashTransactionKind, amount: Decimal) -> Decimal {
        match kind {
            CashTransactionKind::Vente | CashTransactionKind::Achat => round_money(amount),
            CashTransactionKind::Versement
            | CashTransactionKind::Paiement
            | CashTransactionKind::RetourVente
            | CashTransactionKind::RetourAchat => round_money(-amount),
        }
    }

    /// The delta applied to the counterparty's running balance.
    ///
    /// Equal to `signed_amount`; kept separate because a transaction
    /// can be recorded without touching the balance (retail sales),
    /// and reversal must know which delta was actually applied.
    #[must_use]
    pub fn balance_delta(kind: CashTransactionKind, amount: Decimal) -> Decimal {
        Self::signed_amount(kind, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sale_raises_customer_balance() {
        assert_eq!(
            AccountingService::balance_delta(CashTransactionKind::Vente, dec!(6000)),
            dec!(6000.00)
        );
    }

    #[test]
    fn test_payment_lowers_customer_balance() {
        assert_eq!(
            AccountingService::balance_delta(CashTransactionKind::Versement, dec!(2500)),
            dec!(-2500.00)
        );
    }

    #[test]
    fn test_return_credit_lowers_balance_on_both_sides() {
        assert_eq!(
            AccountingService::balance_delta(CashTransactionKind::RetourVente, dec!(300)),
            dec!(-300.00)
        );
        assert_eq!(
            AccountingService::balance_delta(CashTransactionKind::RetourAchat, dec!(300)),
            dec!(-300.00)
        );
    }

    #[test]
    fn test_purchase_raises_supplier_balance() {
        assert_eq!(
            AccountingService::balance_delta(CashTransactionKind::Achat, dec!(1200.505)),
            dec!(1200.50)
        );
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert_eq!(
            AccountingService::validate_amount(Decimal::ZERO),
            Err(AccountingError::NonPositiveAmount(Decimal::ZERO))
        );
        assert!(AccountingService::validate_amount(dec!(0.01)).is_ok());
    }
}
