//! Pure purchase order business rules.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::PurchasingError;
use super::types::{PurchaseOrderStatus, ReceiptLine};

/// The receipt-relevant state of one purchase order item.
#[derive(Debug, Clone, Copy)]
pub struct ItemState {
    /// Row id.
    pub item_id: Uuid,
    /// Ordered quantity, purchase unit.
    pub quantity: Decimal,
    /// Already received quantity, purchase unit.
    pub received_quantity: Decimal,
}

/// Stateless purchase order validation service.
pub struct PurchaseService;

impl PurchaseService {
    /// Validates a goods receipt against the order's items.
    ///
    /// Every line must reference a known item, carry a positive
    /// quantity, and fit within what remains to be received.
    pub fn validate_receive(
        status: PurchaseOrderStatus,
        items: &[ItemState],
        lines: &[ReceiptLine],
    ) -> Result<(), PurchasingError> {
        if status == PurchaseOrderStatus::Cancelled {
            return Err(PurchasingError::Cancelled);
        }
        if lines.is_empty() {
            return Err(PurchasingError::EmptyReceipt);
        }
        for line in lines {
            if line.quantity <= Decimal::ZERO {
                return Err(PurchasingError::NonPositiveQuantity(line.quantity));
            }
            let item = items
                .iter()
                .find(|i| i.item_id == line.purchase_order_item_id)
                .ok_or(PurchasingError::UnknownItem(line.purchase_order_item_id))?;
            let remaining = item.quantity - item.received_quantity;
            if line.quantity > remaining {
                return Err(PurchasingError::OverReceipt {
                    requested: line.quantity,
                    remaining,
                });
            }
        }
        Ok(())
    }

    /// Recomputes the order status from its item totals.
    #[must_use]
    pub fn derive_status(items: &[ItemState]) -> PurchaseOrderStatus {
        let ordered: Decimal = items.iter().map(|i| i.quantity).sum();
        let received: Decimal = items.iter().map(|i| i.received_quantity).sum();
        PurchaseOrderStatus::from_totals(received, ordered)
    }

    /// Validates cancellation: only orders that never received stock.
    pub fn validate_cancel(status: PurchaseOrderStatus) -> Result<(), PurchasingError> {
        match status {
            PurchaseOrderStatus::Pending => Ok(()),
            PurchaseOrderStatus::Cancelled => Err(PurchasingError::Cancelled),
            other => Err(PurchasingError::CannotCancel(other)),
        }
    }

    /// Validates removing a single item from the order.
    pub fn validate_delete_item(item: &ItemState) -> Result<(), PurchasingError> {
        if item.received_quantity > Decimal::ZERO {
            return Err(PurchasingError::ReferentialConflict(item.item_id));
        }
        Ok(())
    }

    /// Validates the new ordered quantity of a line kept across an
    /// edit. Shrinking it below what was already received would make
    /// the line over-received and flip the derived status early.
    pub fn validate_edit_item(
        item: &ItemState,
        new_quantity: Decimal,
    ) -> Result<(), PurchasingError> {
        if new_quantity < item.received_quantity {
            return Err(PurchasingError::OrderedBelowReceived {
                ordered: new_quantity,
                received: item.received_quantity,
            });
        }
        Ok(())
    }

    /// Validates that the order can be edited at all.
    pub fn validate_edit(status: PurchaseOrderStatus) -> Result<(), PurchasingError> {
        if status == PurchaseOrderStatus::Cancelled {
            return Err(PurchasingError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(qty: Decimal, received: Decimal) -> ItemState {
        ItemState {
            item_id: Uuid::now_v7(),
            quantity: qty,
            received_quantity: received,
        }
    }

    #[test]
    fn test_receive_full_order() {
        let items = vec![item(dec!(100), dec!(0))];
        let lines = vec![ReceiptLine {
            purchase_order_item_id: items[0].item_id,
            quantity: dec!(100),
        }];
        assert!(
            PurchaseService::validate_receive(PurchaseOrderStatus::Pending, &items, &lines)
                .is_ok()
        );
    }

    #[test]
    fn test_over_receipt_rejected() {
        let items = vec![item(dec!(100), dec!(80))];
        let lines = vec![ReceiptLine {
            purchase_order_item_id: items[0].item_id,
            quantity: dec!(30),
        }];
        let result =
            PurchaseService::validate_receive(PurchaseOrderStatus::Partial, &items, &lines);
        assert_eq!(
            result,
            Err(PurchasingError::OverReceipt {
                requested: dec!(30),
                remaining: dec!(20),
            })
        );
    }

    #[test]
    fn test_receive_unknown_item() {
        let items = vec![item(dec!(100), dec!(0))];
        let stray = Uuid::now_v7();
        let lines = vec![ReceiptLine {
            purchase_order_item_id: stray,
            quantity: dec!(10),
        }];
        let result =
            PurchaseService::validate_receive(PurchaseOrderStatus::Pending, &items, &lines);
        assert_eq!(result, Err(PurchasingError::UnknownItem(stray)));
    }

    #[test]
    fn test_receive_against_cancelled() {
        let result = PurchaseService::validate_receive(PurchaseOrderStatus::Cancelled, &[], &[]);
        assert_eq!(result, Err(PurchasingError::Cancelled));
    }

    #[test]
    fn test_derive_status_after_partial_receipt() {
        let items = vec![item(dec!(100), dec!(40)), item(dec!(50), dec!(0))];
        assert_eq!(
            PurchaseService::derive_status(&items),
            PurchaseOrderStatus::Partial
        );
    }

    #[test]
    fn test_cancel_only_pending() {
        assert!(PurchaseService::validate_cancel(PurchaseOrderStatus::Pending).is_ok());
        assert_eq!(
            PurchaseService::validate_cancel(PurchaseOrderStatus::Partial),
            Err(PurchasingError::CannotCancel(PurchaseOrderStatus::Partial))
        );
    }

    #[test]
    fn test_edit_cannot_shrink_below_received() {
        let partially_received = item(dec!(100), dec!(40));
        assert_eq!(
            PurchaseService::validate_edit_item(&partially_received, dec!(30)),
            Err(PurchasingError::OrderedBelowReceived {
                ordered: dec!(30),
                received: dec!(40),
            })
        );
        assert!(PurchaseService::validate_edit_item(&partially_received, dec!(40)).is_ok());
        assert!(PurchaseService::validate_edit_item(&partially_received, dec!(120)).is_ok());
    }

    #[test]
    fn test_delete_received_item_conflicts() {
        let received = item(dec!(100), dec!(1));
        assert_eq!(
            PurchaseService::validate_delete_item(&received),
            Err(PurchasingError::ReferentialConflict(received.item_id))
        );
        assert!(PurchaseService::validate_delete_item(&item(dec!(100), dec!(0))).is_ok());
    }
}
