//! Pure order business rules.
//!
//! The service validates transitions and computes totals; it never
//! touches the database. Repositories feed it current state and
//! execute the results transactionally.

use rust_decimal::Decimal;

use tessera_shared::types::quantity::round_money;

use super::error::OrderError;
use super::types::{CustomerKind, LineAmounts, OrderStatus, OrderTotals};

/// Stateless order validation and calculation service.
pub struct OrderService;

impl OrderService {
    /// Validates that a line can be added or removed in the current status.
    pub fn validate_edit_items(status: OrderStatus) -> Result<(), OrderError> {
        if status == OrderStatus::Cancelled {
            return Err(OrderError::CannotEditCancelled);
        }
        if !status.is_editable() {
            return Err(OrderError::NotEditable(status));
        }
        Ok(())
    }

    /// Validates order confirmation: pending only, at least one line,
    /// a strictly positive total, and a non-negative payment.
    pub fn validate_confirm(
        status: OrderStatus,
        line_count: usize,
        total: Decimal,
        payment: Decimal,
    ) -> Result<(), OrderError> {
        if !status.can_transition(OrderStatus::Confirmed) {
            return Err(OrderError::InvalidStateTransition {
                from: status,
                to: OrderStatus::Confirmed,
            });
        }
        if line_count == 0 {
            return Err(OrderError::EmptyOrder);
        }
        if total <= Decimal::ZERO {
            return Err(OrderError::ZeroTotal);
        }
        if payment < Decimal::ZERO {
            return Err(OrderError::NegativePayment);
        }
        Ok(())
    }

    /// Validates a delivery-tracking transition (processing, shipped, delivered).
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if !from.can_transition(to) {
            return Err(OrderError::InvalidStateTransition { from, to });
        }
        Ok(())
    }

    /// Validates cancellation. Only pending orders can be cancelled;
    /// later statuses must be edited back to pending first.
    pub fn validate_cancel(status: OrderStatus) -> Result<(), OrderError> {
        Self::validate_transition(status, OrderStatus::Cancelled)
    }

    /// Validates deletion. Deleting destroys the audit trail, so it is
    /// restricted to orders that never produced side effects beyond
    /// reservations.
    pub fn validate_delete(status: OrderStatus) -> Result<(), OrderError> {
        if status != OrderStatus::Pending {
            return Err(OrderError::CanOnlyDeletePending(status));
        }
        Ok(())
    }

    /// Computes the header total from the line amounts.
    ///
    /// Each line is rounded to money precision before summing, so the
    /// stored total always equals the sum of the printed lines.
    #[must_use]
    pub fn compute_totals(lines: &[LineAmounts]) -> OrderTotals {
        let hundred = Decimal::ONE_HUNDRED;
        let total_amount = lines
            .iter()
            .map(|line| {
                let gross = line.quantity * line.unit_price;
                let discounted = gross * (hundred - line.discount_pct) / hundred;
                round_money(discounted)
            })
            .sum();
        OrderTotals { total_amount }
    }

    /// Returns the line amount of a single line, rounded to money precision.
    #[must_use]
    pub fn line_total(line: &LineAmounts) -> Decimal {
        Self::compute_totals(std::slice::from_ref(line)).total_amount
    }

    /// The customer balance delta recorded at confirmation.
    ///
    /// Wholesale customers accrue the unpaid remainder on their
    /// running balance; retail sales are settled on the spot and
    /// never touch a balance.
    #[must_use]
    pub fn balance_delta_on_confirm(
        kind: CustomerKind,
        total: Decimal,
        payment: Decimal,
    ) -> Decimal {
        match kind {
            CustomerKind::Wholesale => round_money(total - payment),
            CustomerKind::Retail => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(qty: Decimal, price: Decimal, discount: Decimal) -> LineAmounts {
        LineAmounts {
            quantity: qty,
            unit_price: price,
            discount_pct: discount,
        }
    }

    #[test]
    fn test_compute_totals_with_discount() {
        let lines = vec![
            line(dec!(7.2), dec!(1500), dec!(0)),
            line(dec!(10), dec!(200), dec!(10)),
        ];
        let totals = OrderService::compute_totals(&lines);
        // 7.2 * 1500 = 10800; 10 * 200 * 0.9 = 1800
        assert_eq!(totals.total_amount, dec!(12600.00));
    }

    #[test]
    fn test_lines_rounded_before_summing() {
        // 3 * 0.335 = 1.005, rounds half-even to 1.00 per line.
        let lines = vec![line(dec!(3), dec!(0.335), dec!(0)); 2];
        let totals = OrderService::compute_totals(&lines);
        assert_eq!(totals.total_amount, dec!(2.00));
    }

    #[test]
    fn test_confirm_requires_positive_total() {
        let result =
            OrderService::validate_confirm(OrderStatus::Pending, 1, dec!(0), dec!(0));
        assert_eq!(result, Err(OrderError::ZeroTotal));
    }

    #[test]
    fn test_confirm_requires_pending() {
        let result =
            OrderService::validate_confirm(OrderStatus::Confirmed, 1, dec!(100), dec!(0));
        assert_eq!(
            result,
            Err(OrderError::InvalidStateTransition {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Confirmed,
            })
        );
    }

    #[test]
    fn test_confirm_rejects_empty_order() {
        let result = OrderService::validate_confirm(OrderStatus::Pending, 0, dec!(100), dec!(0));
        assert_eq!(result, Err(OrderError::EmptyOrder));
    }

    #[test]
    fn test_wholesale_balance_delta() {
        let delta = OrderService::balance_delta_on_confirm(
            CustomerKind::Wholesale,
            dec!(10000),
            dec!(4000),
        );
        assert_eq!(delta, dec!(6000.00));
    }

    #[test]
    fn test_retail_never_touches_balance() {
        let delta = OrderService::balance_delta_on_confirm(
            CustomerKind::Retail,
            dec!(10000),
            dec!(4000),
        );
        assert_eq!(delta, Decimal::ZERO);
    }

    #[test]
    fn test_cannot_cancel_confirmed() {
        assert!(OrderService::validate_cancel(OrderStatus::Confirmed).is_err());
        assert!(OrderService::validate_cancel(OrderStatus::Pending).is_ok());
    }

    #[test]
    fn test_delete_only_pending() {
        assert!(OrderService::validate_delete(OrderStatus::Pending).is_ok());
        assert_eq!(
            OrderService::validate_delete(OrderStatus::Shipped),
            Err(OrderError::CanOnlyDeletePending(OrderStatus::Shipped))
        );
    }

    #[test]
    fn test_edit_items_pending_only() {
        assert!(OrderService::validate_edit_items(OrderStatus::Pending).is_ok());
        assert_eq!(
            OrderService::validate_edit_items(OrderStatus::Confirmed),
            Err(OrderError::NotEditable(OrderStatus::Confirmed))
        );
        assert_eq!(
            OrderService::validate_edit_items(OrderStatus::Cancelled),
            Err(OrderError::CannotEditCancelled)
        );
    }

    #[test]
    fn test_delivery_chain() {
        assert!(OrderService::validate_transition(
            OrderStatus::Confirmed,
            OrderStatus::Processing
        )
        .is_ok());
        assert!(OrderService::validate_transition(
            OrderStatus::Processing,
            OrderStatus::Shipped
        )
        .is_ok());
        assert!(OrderService::validate_transition(
            OrderStatus::Shipped,
            OrderStatus::Delivered
        )
        .is_ok());
        assert!(OrderService::validate_transition(
            OrderStatus::Delivered,
            OrderStatus::Shipped
        )
        .is_err());
    }
}
