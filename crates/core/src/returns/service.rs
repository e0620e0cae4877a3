//! Pure return business rules.

use rust_decimal::Decimal;

use tessera_shared::types::quantity::round_money;

use super::error::ReturnError;
use super::types::{ReturnDirection, ReturnLine, ReturnStatus};

/// What approving a return will do, computed before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnEffect {
    /// Which way every line moves stock.
    pub direction: ReturnDirection,
    /// Total refund, 2-decimal money.
    pub refund_total: Decimal,
}

/// Stateless return validation service.
pub struct ReturnService;

impl ReturnService {
    /// Validates the lines of a return being created or edited.
    pub fn validate_lines(lines: &[ReturnLine]) -> Result<(), ReturnError> {
        if lines.is_empty() {
            return Err(ReturnError::EmptyReturn);
        }
        for line in lines {
            if line.quantity_stock_unit <= Decimal::ZERO {
                return Err(ReturnError::NonPositiveQuantity(line.quantity_stock_unit));
            }
            if line.amount < Decimal::ZERO {
                return Err(ReturnError::NegativeAmount(line.amount));
            }
        }
        Ok(())
    }

    /// Validates and plans approval. Approval is one-way and
    /// pending-only; the returned effect is executed by the
    /// repository in a single transaction.
    pub fn plan_approval(
        status: ReturnStatus,
        direction: ReturnDirection,
        lines: &[ReturnLine],
    ) -> Result<ReturnEffect, ReturnError> {
        if status != ReturnStatus::Pending {
            return Err(ReturnError::InvalidStateTransition(status));
        }
        Self::validate_lines(lines)?;
        let refund_total = round_money(lines.iter().map(|l| l.amount).sum());
        Ok(ReturnEffect {
            direction,
            refund_total,
        })
    }

    /// Validates rejection: pending-only, nothing to undo.
    pub fn validate_reject(status: ReturnStatus) -> Result<(), ReturnError> {
        if status != ReturnStatus::Pending {
            return Err(ReturnError::InvalidStateTransition(status));
        }
        Ok(())
    }

    /// Validates deletion: pending-only, approved returns have moved
    /// stock and must stay on record.
    pub fn validate_delete(status: ReturnStatus) -> Result<(), ReturnError> {
        if status != ReturnStatus::Pending {
            return Err(ReturnError::InvalidStateTransition(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn line(qty: Decimal, amount: Decimal) -> ReturnLine {
        ReturnLine {
            product_id: Uuid::now_v7(),
            warehouse_id: Uuid::now_v7(),
            quantity_stock_unit: qty,
            amount,
        }
    }

    #[test]
    fn test_plan_approval_totals_refund() {
        let lines = vec![line(dec!(7.2), dec!(10800)), line(dec!(3.6), dec!(5400))];
        let effect =
            ReturnService::plan_approval(ReturnStatus::Pending, ReturnDirection::Customer, &lines)
                .unwrap();
        assert_eq!(effect.refund_total, dec!(16200.00));
        assert_eq!(effect.direction, ReturnDirection::Customer);
    }

    #[test]
    fn test_approval_is_one_way() {
        let lines = vec![line(dec!(1), dec!(100))];
        let result =
            ReturnService::plan_approval(ReturnStatus::Approved, ReturnDirection::Customer, &lines);
        assert_eq!(
            result,
            Err(ReturnError::InvalidStateTransition(ReturnStatus::Approved))
        );
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let lines = vec![line(dec!(0), dec!(100))];
        assert_eq!(
            ReturnService::validate_lines(&lines),
            Err(ReturnError::NonPositiveQuantity(dec!(0)))
        );
    }

    #[test]
    fn test_empty_return_rejected() {
        assert_eq!(
            ReturnService::validate_lines(&[]),
            Err(ReturnError::EmptyReturn)
        );
    }

    #[test]
    fn test_reject_and_delete_pending_only() {
        assert!(ReturnService::validate_reject(ReturnStatus::Pending).is_ok());
        assert!(ReturnService::validate_delete(ReturnStatus::Pending).is_ok());
        assert_eq!(
            ReturnService::validate_delete(ReturnStatus::Approved),
            Err(ReturnError::InvalidStateTransition(ReturnStatus::Approved))
        );
        assert_eq!(
            ReturnService::validate_reject(ReturnStatus::Rejected),
            Err(ReturnError::InvalidStateTransition(ReturnStatus::Rejected))
        );
    }
}
