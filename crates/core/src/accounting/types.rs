//! Accounting domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The business event a cash transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashTransactionKind {
    /// Sale to a customer.
    Vente,
    /// Purchase from a supplier.
    Achat,
    /// Payment received from a customer.
    Versement,
    /// Payment made to a supplier.
    Paiement,
    /// Credit for a customer return.
    RetourVente,
    /// Credit for a supplier return.
    RetourAchat,
}

impl CashTransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vente => "vente",
            Self::Achat => "achat",
            Self::Versement => "versement",
            Self::Paiement => "paiement",
            Self::RetourVente => "retour_vente",
            Self::RetourAchat => "retour_achat",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vente" => Some(Self::Vente),
            "achat" => Some(Self::Achat),
            "versement" => Some(Self::Versement),
            "paiement" => Some(Self::Paiement),
            "retour_vente" => Some(Self::RetourVente),
            "retour_achat" => Some(Self::RetourAchat),
            _ => None,
        }
    }

    /// Which side of the ledger this kind belongs to.
    #[must_use]
    pub fn counterparty(&self) -> CounterpartyKind {
        match self {
            Self::Vente | Self::Versement | Self::RetourVente => CounterpartyKind::Customer,
            Self::Achat | Self::Paiement | Self::RetourAchat => CounterpartyKind::Supplier,
        }
    }
}

impl fmt::Display for CashTransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which entity's running balance a transaction touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyKind {
    /// A customer account.
    Customer,
    /// A supplier account.
    Supplier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            CashTransactionKind::Vente,
            CashTransactionKind::Achat,
            CashTransactionKind::Versement,
            CashTransactionKind::Paiement,
            CashTransactionKind::RetourVente,
            CashTransactionKind::RetourAchat,
        ] {
            assert_eq!(CashTransactionKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_counterparty_sides() {
        assert_eq!(
            CashTransactionKind::Vente.counterparty(),
            CounterpartyKind::Customer
        );
        assert_eq!(
            CashTransactionKind::Paiement.counterparty(),
            CounterpartyKind::Supplier
        );
    }
}
