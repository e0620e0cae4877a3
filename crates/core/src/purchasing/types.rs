//! Purchasing domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fulfillment status of a purchase order.
///
/// Never stored as independent state: it is recomputed from the
/// received-vs-ordered quantity totals after every receipt or edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    /// Nothing received yet.
    Pending,
    /// Some quantity received, less than ordered.
    Partial,
    /// Everything ordered has been received.
    Received,
    /// Cancelled before anything was received. Terminal.
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "partial" => Some(Self::Partial),
            "received" => Some(Self::Received),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the order has moved any stock.
    #[must_use]
    pub fn has_moved_stock(&self) -> bool {
        matches!(self, Self::Partial | Self::Received)
    }

    /// Derives the status from the quantity totals.
    #[must_use]
    pub fn from_totals(received: Decimal, ordered: Decimal) -> Self {
        if received <= Decimal::ZERO {
            Self::Pending
        } else if received < ordered {
            Self::Partial
        } else {
            Self::Received
        }
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of an incoming goods receipt.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptLine {
    /// The purchase order item this receipt applies to.
    pub purchase_order_item_id: Uuid,
    /// Quantity received, in the item's purchase unit.
    pub quantity: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_from_totals() {
        assert_eq!(
            PurchaseOrderStatus::from_totals(dec!(0), dec!(100)),
            PurchaseOrderStatus::Pending
        );
        assert_eq!(
            PurchaseOrderStatus::from_totals(dec!(40), dec!(100)),
            PurchaseOrderStatus::Partial
        );
        assert_eq!(
            PurchaseOrderStatus::from_totals(dec!(100), dec!(100)),
            PurchaseOrderStatus::Received
        );
        // Over-delivery counts as received.
        assert_eq!(
            PurchaseOrderStatus::from_totals(dec!(105), dec!(100)),
            PurchaseOrderStatus::Received
        );
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            PurchaseOrderStatus::Pending,
            PurchaseOrderStatus::Partial,
            PurchaseOrderStatus::Received,
            PurchaseOrderStatus::Cancelled,
        ] {
            assert_eq!(PurchaseOrderStatus::parse(status.as_str()), Some(status));
        }
    }
}
