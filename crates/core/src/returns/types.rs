//! Return domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a return (either direction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    /// Recorded, no stock or money has moved.
    Pending,
    /// Stock and accounting applied. Terminal.
    Approved,
    /// Refused; nothing was ever applied. Terminal.
    Rejected,
}

impl ReturnStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which way the goods move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnDirection {
    /// Customer sends goods back; stock comes in, money is credited.
    Customer,
    /// Goods go back to the supplier; stock goes out.
    Supplier,
}

/// One return line with quantities already in the stocking unit.
#[derive(Debug, Clone, Copy)]
pub struct ReturnLine {
    /// Product being returned.
    pub product_id: Uuid,
    /// Warehouse the stock moves through.
    pub warehouse_id: Uuid,
    /// Quantity in the stocking unit.
    pub quantity_stock_unit: Decimal,
    /// Refund amount for this line.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ReturnStatus::Pending,
            ReturnStatus::Approved,
            ReturnStatus::Rejected,
        ] {
            assert_eq!(ReturnStatus::parse(status.as_str()), Some(status));
        }
    }
}
