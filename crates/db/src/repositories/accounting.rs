//! Accounting repository — the single write path to the cash ledger.
//!
//! Every mutation site (order confirm, receipts, return approvals,
//! payments) goes through [`record_in_txn`]; nothing else inserts into
//! `cash_transactions`, so the denormalized `current_balance` columns
//! cannot drift from the ledger.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use tessera_core::accounting::{
    AccountingError, AccountingService, CashTransactionKind, CounterpartyKind,
};

use crate::entities::{cash_transactions, customers, sea_orm_active_enums::ReferenceType, suppliers};

use super::convert;

/// One cash ledger entry to record.
#[derive(Debug, Clone)]
pub struct CashRecordInput {
    /// Business event kind.
    pub kind: CashTransactionKind,
    /// Positive magnitude; the sign comes from the kind.
    pub amount: Decimal,
    /// Customer or supplier id, per the kind's counterparty side.
    pub counterparty_id: Uuid,
    /// Document the entry settles.
    pub reference_type: ReferenceType,
    /// Document id.
    pub reference_id: Uuid,
    /// Whether the counterparty balance moves (retail sales do not).
    pub affects_balance: bool,
    /// User recording the entry.
    pub actor: Uuid,
}

fn db_err(err: DbErr) -> AccountingError {
    AccountingError::Database(err.to_string())
}

/// Appends one ledger row and, when `affects_balance`, applies the
/// balance delta to the locked counterparty row. Runs inside the
/// caller's transaction.
pub(crate) async fn record_in_txn(
    txn: &DatabaseTransaction,
    input: &CashRecordInput,
) -> Result<cash_transactions::Model, AccountingError> {
    AccountingService::validate_amount(input.amount)?;
    let signed = AccountingService::signed_amount(input.kind, input.amount);

    if input.affects_balance {
        let delta = AccountingService::balance_delta(input.kind, input.amount);
        apply_balance_delta(txn, input.kind.counterparty(), input.counterparty_id, delta).await?;
    }

    let row = cash_transactions::ActiveModel {
        id: Set(Uuid::now_v7()),
        kind: Set(convert::cash_kind_from_core(input.kind)),
        amount: Set(signed),
        counterparty_kind: Set(convert::counterparty_from_core(input.kind.counterparty())),
        counterparty_id: Set(input.counterparty_id),
        reference_type: Set(input.reference_type.clone()),
        reference_id: Set(input.reference_id),
        affects_balance: Set(input.affects_balance),
        created_by: Set(input.actor),
        created_at: Set(Utc::now().into()),
    };
    let model = row.insert(txn).await.map_err(db_err)?;
    debug!(kind = %input.kind, amount = %signed, reference_id = %input.reference_id,
        "cash transaction recorded");
    Ok(model)
}

/// Deletes the cash rows for a document and applies the inverse of
/// every balance delta they carried, in the caller's transaction.
///
/// Only rows whose `affects_balance` flag is set move the balance
/// back, which makes reversal exact even for retail orders whose sale
/// row never touched a balance.
pub(crate) async fn reverse_for_reference(
    txn: &DatabaseTransaction,
    reference_type: ReferenceType,
    reference_id: Uuid,
) -> Result<usize, AccountingError> {
    let rows = cash_transactions::Entity::find()
        .filter(cash_transactions::Column::ReferenceType.eq(reference_type.clone()))
        .filter(cash_transactions::Column::ReferenceId.eq(reference_id))
        .all(txn)
        .await
        .map_err(db_err)?;

    if rows.is_empty() {
        return Err(AccountingError::NothingToReverse(reference_id));
    }

    for row in &rows {
        if row.affects_balance {
            let side = match row.counterparty_kind {
                crate::entities::sea_orm_active_enums::CounterpartyKind::Customer => {
                    CounterpartyKind::Customer
                }
                crate::entities::sea_orm_active_enums::CounterpartyKind::Supplier => {
                    CounterpartyKind::Supplier
                }
            };
            // The stored amount is already signed; the inverse delta
            // is its negation.
            apply_balance_delta(txn, side, row.counterparty_id, -row.amount).await?;
        }
    }

    let deleted = cash_transactions::Entity::delete_many()
        .filter(cash_transactions::Column::ReferenceType.eq(reference_type))
        .filter(cash_transactions::Column::ReferenceId.eq(reference_id))
        .exec(txn)
        .await
        .map_err(db_err)?;

    Ok(usize::try_from(deleted.rows_affected).unwrap_or(usize::MAX))
}

/// Locks the counterparty row and shifts its running balance.
pub(crate) async fn apply_balance_delta(
    txn: &DatabaseTransaction,
    side: CounterpartyKind,
    counterparty_id: Uuid,
    delta: Decimal,
) -> Result<(), AccountingError> {
    match side {
        CounterpartyKind::Customer => {
            let customer = customers::Entity::find_by_id(counterparty_id)
                .lock_exclusive()
                .one(txn)
                .await
                .map_err(db_err)?
                .ok_or(AccountingError::CounterpartyNotFound(counterparty_id))?;
            let balance = customer.current_balance + delta;
            let mut active: customers::ActiveModel = customer.into();
            active.current_balance = Set(balance);
            active.updated_at = Set(Utc::now().into());
            active.update(txn).await.map_err(db_err)?;
        }
        CounterpartyKind::Supplier => {
            let supplier = suppliers::Entity::find_by_id(counterparty_id)
                .lock_exclusive()
                .one(txn)
                .await
                .map_err(db_err)?
                .ok_or(AccountingError::CounterpartyNotFound(counterparty_id))?;
            let balance = supplier.current_balance + delta;
            let mut active: suppliers::ActiveModel = supplier.into();
            active.current_balance = Set(balance);
            active.updated_at = Set(Utc::now().into());
            active.update(txn).await.map_err(db_err)?;
        }
    }
    Ok(())
}

/// Accounting repository for standalone ledger operations (customer
/// and supplier payments, ledger listings).
#[derive(Clone)]
pub struct AccountingRepository {
    db: DatabaseConnection,
}

impl AccountingRepository {
    /// Creates a new accounting repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records one ledger entry in its own transaction.
    pub async fn record(
        &self,
        input: CashRecordInput,
    ) -> Result<cash_transactions::Model, AccountingError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let model = record_in_txn(&txn, &input).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(model)
    }

    /// Records a customer payment (versement) against their balance.
    pub async fn record_customer_payment(
        &self,
        customer_id: Uuid,
        amount: Decimal,
        reference_id: Uuid,
        actor: Uuid,
    ) -> Result<cash_transactions::Model, AccountingError> {
        self.record(CashRecordInput {
            kind: CashTransactionKind::Versement,
            amount,
            counterparty_id: customer_id,
            reference_type: ReferenceType::Order,
            reference_id,
            affects_balance: true,
            actor,
        })
        .await
    }

    /// Records a payment made to a supplier (paiement).
    pub async fn record_supplier_payment(
        &self,
        supplier_id: Uuid,
        amount: Decimal,
        reference_id: Uuid,
        actor: Uuid,
    ) -> Result<cash_transactions::Model, AccountingError> {
        self.record(CashRecordInput {
            kind: CashTransactionKind::Paiement,
            amount,
            counterparty_id: supplier_id,
            reference_type: ReferenceType::PurchaseOrder,
            reference_id,
            affects_balance: true,
            actor,
        })
        .await
    }

    /// Lists the ledger rows for one counterparty, newest first.
    pub async fn ledger_for_counterparty(
        &self,
        side: CounterpartyKind,
        counterparty_id: Uuid,
    ) -> Result<Vec<cash_transactions::Model>, AccountingError> {
        cash_transactions::Entity::find()
            .filter(
                cash_transactions::Column::CounterpartyKind.eq(convert::counterparty_from_core(side)),
            )
            .filter(cash_transactions::Column::CounterpartyId.eq(counterparty_id))
            .order_by_desc(cash_transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}
