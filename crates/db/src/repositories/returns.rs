//! Return repository, covering both directions.
//!
//! Customer returns bring stock in and credit the customer; purchase
//! returns send stock back out and credit against the supplier.
//! Creation records intent only; `approve` is the single one-way gate
//! that moves stock and money, executing the plan the pure service
//! computed inside one transaction.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use tessera_core::accounting::CashTransactionKind;
use tessera_core::inventory::StockService;
use tessera_core::returns::{ReturnDirection, ReturnError, ReturnLine, ReturnService, ReturnStatus};
use tessera_core::units::{Unit, UnitService};
use tessera_shared::config::EngineConfig;

use crate::catalog::CatalogCache;
use crate::entities::{
    customers, products, purchase_return_items, purchase_returns, return_items, returns,
    sea_orm_active_enums::{self as db_enums, MovementType, ReferenceType},
};

use super::accounting::{self, CashRecordInput};
use super::convert;
use super::stock::{
    self, append_movement, levels_of, lock_record, persist_levels, set_lock_timeout, StockKey,
};

/// One line of a new return, in the unit the operator entered.
#[derive(Debug, Clone)]
pub struct NewReturnLine {
    /// Product coming back (or going back).
    pub product_id: Uuid,
    /// Quantity in `unit`.
    pub quantity: Decimal,
    /// Unit the quantity was entered in.
    pub unit: Unit,
    /// Refund amount for this line.
    pub amount: Decimal,
}

fn db_err(err: DbErr) -> ReturnError {
    ReturnError::Database(err.to_string())
}

/// Repository over customer returns and purchase returns.
#[derive(Clone)]
pub struct ReturnRepository {
    db: DatabaseConnection,
    catalog: CatalogCache,
    lock_timeout_secs: u64,
}

impl ReturnRepository {
    /// Creates a new return repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, catalog: CatalogCache, engine: &EngineConfig) -> Self {
        Self {
            db,
            catalog,
            lock_timeout_secs: engine.lock_timeout_secs,
        }
    }

    /// Records a pending customer return. Conversions are snapshotted
    /// at creation; no stock or money moves yet.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_customer_return(
        &self,
        return_number: String,
        customer_id: Uuid,
        warehouse_id: Uuid,
        order_id: Option<Uuid>,
        lines: Vec<NewReturnLine>,
        actor: Uuid,
    ) -> Result<returns::Model, ReturnError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();

        let converted = convert_lines(&txn, warehouse_id, &lines).await?;
        ReturnService::validate_lines(&converted)?;
        let total: Decimal = converted.iter().map(|l| l.amount).sum();

        let header = returns::ActiveModel {
            id: Set(Uuid::now_v7()),
            return_number: Set(return_number),
            customer_id: Set(customer_id),
            warehouse_id: Set(warehouse_id),
            order_id: Set(order_id),
            status: Set(db_enums::ReturnStatus::Pending),
            total_amount: Set(total),
            approved_by: Set(None),
            approved_at: Set(None),
            created_by: Set(actor),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let header = header.insert(&txn).await.map_err(db_err)?;

        for (line, converted) in lines.iter().zip(&converted) {
            let row = return_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                return_id: Set(header.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                sale_unit: Set(convert::unit_from_core(line.unit)),
                quantity_stock_unit: Set(converted.quantity_stock_unit),
                amount: Set(line.amount),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            row.insert(&txn).await.map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        info!(return_id = %header.id, return_number = %header.return_number,
            "customer return recorded");
        Ok(header)
    }

    /// Records a pending purchase return to a supplier.
    pub async fn create_purchase_return(
        &self,
        return_number: String,
        supplier_id: Uuid,
        warehouse_id: Uuid,
        lines: Vec<NewReturnLine>,
        actor: Uuid,
    ) -> Result<purchase_returns::Model, ReturnError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();

        let converted = convert_lines(&txn, warehouse_id, &lines).await?;
        ReturnService::validate_lines(&converted)?;
        let total: Decimal = converted.iter().map(|l| l.amount).sum();

        let header = purchase_returns::ActiveModel {
            id: Set(Uuid::now_v7()),
            return_number: Set(return_number),
            supplier_id: Set(supplier_id),
            warehouse_id: Set(warehouse_id),
            status: Set(db_enums::ReturnStatus::Pending),
            total_amount: Set(total),
            approved_by: Set(None),
            approved_at: Set(None),
            created_by: Set(actor),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let header = header.insert(&txn).await.map_err(db_err)?;

        for (line, converted) in lines.iter().zip(&converted) {
            let row = purchase_return_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                purchase_return_id: Set(header.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                purchase_unit: Set(convert::unit_from_core(line.unit)),
                quantity_stock_unit: Set(converted.quantity_stock_unit),
                amount: Set(line.amount),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            row.insert(&txn).await.map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        info!(purchase_return_id = %header.id, return_number = %header.return_number,
            "purchase return recorded");
        Ok(header)
    }

    /// Approves a customer return: restocks every line, credits the
    /// refund on the ledger and reduces the customer balance.
    pub async fn approve_customer_return(
        &self,
        return_id: Uuid,
        actor: Uuid,
    ) -> Result<returns::Model, ReturnError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let header = returns::Entity::find_by_id(return_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ReturnError::NotFound(return_id))?;
        let items = return_items::Entity::find()
            .filter(return_items::Column::ReturnId.eq(return_id))
            .order_by_asc(return_items::Column::CreatedAt)
            .all(&txn)
            .await
            .map_err(db_err)?;

        let lines: Vec<ReturnLine> = items
            .iter()
            .map(|item| ReturnLine {
                product_id: item.product_id,
                warehouse_id: header.warehouse_id,
                quantity_stock_unit: item.quantity_stock_unit,
                amount: item.amount,
            })
            .collect();
        let effect = ReturnService::plan_approval(
            convert::return_status_to_core(&header.status),
            ReturnDirection::Customer,
            &lines,
        )?;

        for line in &lines {
            let key = StockKey::owned(line.product_id, line.warehouse_id);
            let record = lock_record(&txn, &key).await?;
            let levels = StockService::restock(levels_of(&record), line.quantity_stock_unit)?;
            persist_levels(&txn, record, levels).await?;
            append_movement(
                &txn,
                &key,
                MovementType::In,
                line.quantity_stock_unit,
                ReferenceType::Return,
                header.id,
                actor,
            )
            .await?;
        }

        // Retail refunds are paid out on the spot, mirroring order
        // confirmation; only wholesale accounts carry the credit.
        let customer = customers::Entity::find_by_id(header.customer_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ReturnError::NotFound(header.customer_id))?;
        let affects_balance =
            customer.customer_kind == db_enums::CustomerKind::Wholesale;
        accounting::record_in_txn(
            &txn,
            &CashRecordInput {
                kind: CashTransactionKind::RetourVente,
                amount: effect.refund_total,
                counterparty_id: header.customer_id,
                reference_type: ReferenceType::Return,
                reference_id: header.id,
                affects_balance,
                actor,
            },
        )
        .await?;

        let mut active: returns::ActiveModel = header.into();
        active.status = Set(db_enums::ReturnStatus::Approved);
        active.approved_by = Set(Some(actor));
        active.approved_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        for line in &lines {
            self.catalog.spawn_refresh(self.db.clone(), line.product_id);
        }
        info!(return_id = %return_id, refund = %effect.refund_total,
            "customer return approved");
        Ok(updated)
    }

    /// Approves a purchase return: stocks every line back out (failing
    /// on insufficient on-hand) and credits against the supplier.
    pub async fn approve_purchase_return(
        &self,
        return_id: Uuid,
        actor: Uuid,
    ) -> Result<purchase_returns::Model, ReturnError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let header = purchase_returns::Entity::find_by_id(return_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ReturnError::NotFound(return_id))?;
        let items = purchase_return_items::Entity::find()
            .filter(purchase_return_items::Column::PurchaseReturnId.eq(return_id))
            .order_by_asc(purchase_return_items::Column::CreatedAt)
            .all(&txn)
            .await
            .map_err(db_err)?;

        let lines: Vec<ReturnLine> = items
            .iter()
            .map(|item| ReturnLine {
                product_id: item.product_id,
                warehouse_id: header.warehouse_id,
                quantity_stock_unit: item.quantity_stock_unit,
                amount: item.amount,
            })
            .collect();
        let effect = ReturnService::plan_approval(
            convert::return_status_to_core(&header.status),
            ReturnDirection::Supplier,
            &lines,
        )?;

        for line in &lines {
            let key = StockKey::owned(line.product_id, line.warehouse_id);
            let record = lock_record(&txn, &key).await?;
            let levels = StockService::stock_out(levels_of(&record), line.quantity_stock_unit)?;
            persist_levels(&txn, record, levels).await?;
            append_movement(
                &txn,
                &key,
                MovementType::Out,
                -line.quantity_stock_unit,
                ReferenceType::PurchaseReturn,
                header.id,
                actor,
            )
            .await?;
        }

        accounting::record_in_txn(
            &txn,
            &CashRecordInput {
                kind: CashTransactionKind::RetourAchat,
                amount: effect.refund_total,
                counterparty_id: header.supplier_id,
                reference_type: ReferenceType::PurchaseReturn,
                reference_id: header.id,
                affects_balance: true,
                actor,
            },
        )
        .await?;

        let mut active: purchase_returns::ActiveModel = header.into();
        active.status = Set(db_enums::ReturnStatus::Approved);
        active.approved_by = Set(Some(actor));
        active.approved_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        for line in &lines {
            self.catalog.spawn_refresh(self.db.clone(), line.product_id);
        }
        info!(purchase_return_id = %return_id, refund = %effect.refund_total,
            "purchase return approved");
        Ok(updated)
    }

    /// Rejects a pending customer return; nothing to undo.
    pub async fn reject_customer_return(
        &self,
        return_id: Uuid,
    ) -> Result<returns::Model, ReturnError> {
        let header = returns::Entity::find_by_id(return_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(ReturnError::NotFound(return_id))?;
        ReturnService::validate_reject(convert::return_status_to_core(&header.status))?;

        let mut active: returns::ActiveModel = header.into();
        active.status = Set(db_enums::ReturnStatus::Rejected);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await.map_err(db_err)
    }

    /// Rejects a pending purchase return.
    pub async fn reject_purchase_return(
        &self,
        return_id: Uuid,
    ) -> Result<purchase_returns::Model, ReturnError> {
        let header = purchase_returns::Entity::find_by_id(return_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(ReturnError::NotFound(return_id))?;
        ReturnService::validate_reject(convert::return_status_to_core(&header.status))?;

        let mut active: purchase_returns::ActiveModel = header.into();
        active.status = Set(db_enums::ReturnStatus::Rejected);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await.map_err(db_err)
    }

    /// Deletes a pending customer return and its lines.
    pub async fn delete_customer_return(&self, return_id: Uuid) -> Result<(), ReturnError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let header = returns::Entity::find_by_id(return_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ReturnError::NotFound(return_id))?;
        ReturnService::validate_delete(convert::return_status_to_core(&header.status))?;

        return_items::Entity::delete_many()
            .filter(return_items::Column::ReturnId.eq(return_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        returns::Entity::delete_by_id(return_id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)
    }

    /// Deletes a pending purchase return and its lines.
    pub async fn delete_purchase_return(&self, return_id: Uuid) -> Result<(), ReturnError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let header = purchase_returns::Entity::find_by_id(return_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ReturnError::NotFound(return_id))?;
        ReturnService::validate_delete(convert::return_status_to_core(&header.status))?;

        purchase_return_items::Entity::delete_many()
            .filter(purchase_return_items::Column::PurchaseReturnId.eq(return_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        purchase_returns::Entity::delete_by_id(return_id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)
    }
}

/// Converts the operator-entered lines to stocking-unit quantities,
/// snapshotted at creation time.
async fn convert_lines(
    txn: &DatabaseTransaction,
    warehouse_id: Uuid,
    lines: &[NewReturnLine],
) -> Result<Vec<ReturnLine>, ReturnError> {
    let mut converted = Vec::with_capacity(lines.len());
    for line in lines {
        let product = products::Entity::find_by_id(line.product_id)
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(ReturnError::NotFound(line.product_id))?;
        let packaging = convert::packaging_of(&product);
        let derived = stock::derived_pieces_per_box(txn, line.product_id, &packaging).await?;
        let quantity_stock =
            UnitService::to_stocking_unit(&packaging, line.quantity, line.unit, derived)?;
        converted.push(ReturnLine {
            product_id: line.product_id,
            warehouse_id,
            quantity_stock_unit: quantity_stock,
            amount: line.amount,
        });
    }
    Ok(converted)
}
