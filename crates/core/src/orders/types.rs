//! Order domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sales order lifecycle status.
///
/// The valid transitions are:
/// - Pending → Confirmed (confirm)
/// - Pending → Cancelled (cancel)
/// - Confirmed → Processing | Shipped | Delivered (delivery tracking)
/// - Processing → Shipped | Delivered
/// - Shipped → Delivered
///
/// Editing an order of any non-cancelled status reverses its effects and
/// forces it back to Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Editable; items hold reservations but no stock has moved.
    Pending,
    /// Stock deducted, accounting recorded.
    Confirmed,
    /// Being prepared for shipment.
    Processing,
    /// Left the warehouse.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Terminal; only reachable from Pending.
    Cancelled,
}

impl OrderStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if items can be added or removed.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if this status has deducted stock from on-hand.
    #[must_use]
    pub fn has_committed_stock(&self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::Processing | Self::Shipped | Self::Delivered
        )
    }

    /// Returns true if `to` is a legal direct transition from `self`.
    #[must_use]
    pub fn can_transition(&self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (
                    Self::Confirmed,
                    Self::Processing | Self::Shipped | Self::Delivered
                )
                | (Self::Processing, Self::Shipped | Self::Delivered)
                | (Self::Shipped, Self::Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Customer classification driving balance side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerKind {
    /// Walk-in cash customer; order confirmation never touches a balance.
    Retail,
    /// Account customer; unpaid amounts accrue on the running balance.
    Wholesale,
}

impl CustomerKind {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Wholesale => "wholesale",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "retail" => Some(Self::Retail),
            "wholesale" => Some(Self::Wholesale),
            _ => None,
        }
    }
}

/// The amounts of one order line needed for totals computation.
#[derive(Debug, Clone, Copy)]
pub struct LineAmounts {
    /// Quantity in the sale unit.
    pub quantity: Decimal,
    /// Unit price in the sale unit.
    pub unit_price: Decimal,
    /// Discount percentage (0 - 100).
    pub discount_pct: Decimal,
}

/// Computed order header totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of discounted line amounts, 2-decimal money.
    pub total_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_only_pending_is_editable() {
        assert!(OrderStatus::Pending.is_editable());
        assert!(!OrderStatus::Confirmed.is_editable());
        assert!(!OrderStatus::Cancelled.is_editable());
    }

    #[test]
    fn test_cancelled_only_from_pending() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Confirmed.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn test_committed_stock_statuses() {
        assert!(!OrderStatus::Pending.has_committed_stock());
        assert!(OrderStatus::Confirmed.has_committed_stock());
        assert!(OrderStatus::Delivered.has_committed_stock());
        assert!(!OrderStatus::Cancelled.has_committed_stock());
    }
}
