//! Purchase order and goods receipt repository.
//!
//! Receipts are immutable once posted; the order status is never set
//! directly but rederived from the received-vs-ordered totals after
//! every mutation. Edits to orders that already moved stock go through
//! the pure item-list diff, which emits per-key ledger adjustments.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use tessera_core::inventory::StockService;
use tessera_core::purchasing::{
    ItemKey, ItemLine, ItemState, LineChange, PoDiff, PurchaseService, PurchasingError,
    ReceiptLine,
};
use tessera_core::units::{Unit, UnitService};
use tessera_shared::config::EngineConfig;
use tessera_shared::types::round_qty;

use crate::catalog::CatalogCache;
use crate::entities::{
    goods_receipt_items, goods_receipts, products, purchase_order_items, purchase_orders,
    sea_orm_active_enums::{self as db_enums, MovementType, OwnershipType, ReferenceType},
};

use super::stock::{
    self, append_movement, levels_of, lock_record, persist_levels, set_lock_timeout, StockKey,
};
use super::convert;

/// One line of a new or edited purchase order.
#[derive(Debug, Clone)]
pub struct NewPurchaseOrderItem {
    /// Existing row id when the edit keeps a line; `None` for new lines.
    pub item_id: Option<Uuid>,
    /// Product being purchased.
    pub product_id: Uuid,
    /// Ordered quantity in the purchase unit.
    pub quantity: Decimal,
    /// Unit the order was placed in.
    pub purchase_unit: Unit,
    /// Agreed unit cost.
    pub unit_cost: Decimal,
}

fn db_err(err: DbErr) -> PurchasingError {
    PurchasingError::Database(err.to_string())
}

/// Repository over purchase orders, their items and goods receipts.
#[derive(Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
    catalog: CatalogCache,
    lock_timeout_secs: u64,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, catalog: CatalogCache, engine: &EngineConfig) -> Self {
        Self {
            db,
            catalog,
            lock_timeout_secs: engine.lock_timeout_secs,
        }
    }

    /// Creates a pending purchase order with its items.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        po_number: String,
        supplier_kind: db_enums::SupplierKind,
        supplier_id: Uuid,
        warehouse_id: Uuid,
        ownership_type: OwnershipType,
        items: Vec<NewPurchaseOrderItem>,
        actor: Uuid,
    ) -> Result<purchase_orders::Model, PurchasingError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();

        let order = purchase_orders::ActiveModel {
            id: Set(Uuid::now_v7()),
            po_number: Set(po_number),
            supplier_kind: Set(supplier_kind),
            supplier_id: Set(supplier_id),
            warehouse_id: Set(warehouse_id),
            ownership_type: Set(ownership_type),
            status: Set(db_enums::PurchaseOrderStatus::Pending),
            created_by: Set(actor),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let order = order.insert(&txn).await.map_err(db_err)?;

        for item in &items {
            insert_po_item(&txn, order.id, item).await?;
        }

        txn.commit().await.map_err(db_err)?;
        info!(purchase_order_id = %order.id, po_number = %order.po_number,
            items = items.len(), "purchase order created");
        Ok(order)
    }

    /// Loads a purchase order with its items.
    pub async fn get(
        &self,
        po_id: Uuid,
    ) -> Result<(purchase_orders::Model, Vec<purchase_order_items::Model>), PurchasingError> {
        let order = purchase_orders::Entity::find_by_id(po_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(PurchasingError::NotFound(po_id))?;
        let items = items_of(&self.db, po_id).await?;
        Ok((order, items))
    }

    /// Posts an immutable goods receipt: per line, increments the
    /// item's received quantity, converts to the stocking unit and
    /// restocks with an inbound audit row; then rederives the status.
    pub async fn receive(
        &self,
        po_id: Uuid,
        receipt_number: String,
        lines: Vec<ReceiptLine>,
        actor: Uuid,
    ) -> Result<goods_receipts::Model, PurchasingError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let order = lock_po(&txn, po_id).await?;
        let items = items_of(&txn, po_id).await?;
        let states: Vec<ItemState> = items.iter().map(state_of).collect();
        PurchaseService::validate_receive(
            convert::po_status_to_core(&order.status),
            &states,
            &lines,
        )?;

        let now = Utc::now();
        let receipt = goods_receipts::ActiveModel {
            id: Set(Uuid::now_v7()),
            receipt_number: Set(receipt_number),
            purchase_order_id: Set(po_id),
            received_by: Set(actor),
            received_at: Set(now.into()),
            created_at: Set(now.into()),
        };
        let receipt = receipt.insert(&txn).await.map_err(db_err)?;

        let mut touched = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = items
                .iter()
                .find(|i| i.id == line.purchase_order_item_id)
                .ok_or(PurchasingError::UnknownItem(line.purchase_order_item_id))?;

            let product = products::Entity::find_by_id(item.product_id)
                .one(&txn)
                .await
                .map_err(db_err)?
                .ok_or(PurchasingError::UnknownItem(item.product_id))?;
            let packaging = convert::packaging_of(&product);
            let derived =
                stock::derived_pieces_per_box(&txn, item.product_id, &packaging).await?;
            let quantity_stock = UnitService::to_stocking_unit(
                &packaging,
                line.quantity,
                convert::unit_to_core(&item.purchase_unit),
                derived,
            )?;

            let row = goods_receipt_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                goods_receipt_id: Set(receipt.id),
                purchase_order_item_id: Set(item.id),
                quantity: Set(line.quantity),
                quantity_stock_unit: Set(quantity_stock),
                created_at: Set(now.into()),
            };
            row.insert(&txn).await.map_err(db_err)?;

            let mut active: purchase_order_items::ActiveModel = item.clone().into();
            active.received_quantity = Set(round_qty(item.received_quantity + line.quantity));
            active.updated_at = Set(now.into());
            active.update(&txn).await.map_err(db_err)?;

            restock_key(
                &txn,
                &po_key(&order, item.product_id),
                quantity_stock,
                ReferenceType::GoodsReceipt,
                receipt.id,
                actor,
            )
            .await?;
            touched.push(item.product_id);
        }

        // Status is derived, never set directly.
        let states: Vec<ItemState> = items_of(&txn, po_id).await?.iter().map(state_of).collect();
        let status = PurchaseService::derive_status(&states);
        let mut active: purchase_orders::ActiveModel = order.into();
        active.status = Set(convert::po_status_from_core(status));
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        for product_id in touched {
            self.catalog.spawn_refresh(self.db.clone(), product_id);
        }
        info!(purchase_order_id = %po_id, receipt_id = %receipt.id, status = %status,
            "goods receipt posted");
        Ok(receipt)
    }

    /// Replaces the item list of a purchase order, applying the pure
    /// diff's ledger adjustments for orders that already moved stock.
    pub async fn update(
        &self,
        po_id: Uuid,
        new_items: Vec<NewPurchaseOrderItem>,
        actor: Uuid,
    ) -> Result<Vec<purchase_order_items::Model>, PurchasingError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let order = lock_po(&txn, po_id).await?;
        let status = convert::po_status_to_core(&order.status);
        PurchaseService::validate_edit(status)?;
        let moved_stock = status.has_moved_stock();

        // The diff works on ordered quantities in the stocking unit;
        // received_quantity only guards removals.
        let items = items_of(&txn, po_id).await?;
        let mut old_lines = Vec::with_capacity(items.len());
        for item in &items {
            old_lines.push(ItemLine {
                item_id: Some(item.id),
                key: ItemKey {
                    product_id: item.product_id,
                    warehouse_id: order.warehouse_id,
                },
                stock_quantity: convert_quantity(
                    &txn,
                    item.product_id,
                    item.quantity,
                    &item.purchase_unit,
                )
                .await?,
                received_quantity: item.received_quantity,
            });
        }

        let mut new_lines = Vec::with_capacity(new_items.len());
        for item in &new_items {
            new_lines.push(ItemLine {
                item_id: item.item_id,
                key: ItemKey {
                    product_id: item.product_id,
                    warehouse_id: order.warehouse_id,
                },
                stock_quantity: ordered_stock_quantity(&txn, item).await?,
                received_quantity: Decimal::ZERO,
            });
        }
        let diff = PoDiff::compute(&old_lines, &new_lines, moved_stock)?;

        for change in &diff.changes {
            apply_change(&txn, &order, change, actor).await?;
        }

        // Row rewrites: surviving lines keep their id and received
        // quantity, removed lines are deleted, new lines inserted.
        let mut result = Vec::with_capacity(new_items.len());
        for item in &items {
            if !new_items.iter().any(|n| n.item_id == Some(item.id)) {
                purchase_order_items::Entity::delete_by_id(item.id)
                    .exec(&txn)
                    .await
                    .map_err(db_err)?;
            }
        }
        for item in &new_items {
            match item.item_id {
                Some(item_id) => {
                    let existing = items
                        .iter()
                        .find(|i| i.id == item_id)
                        .ok_or(PurchasingError::UnknownItem(item_id))?;
                    PurchaseService::validate_edit_item(&state_of(existing), item.quantity)?;
                    let mut active: purchase_order_items::ActiveModel = existing.clone().into();
                    active.product_id = Set(item.product_id);
                    active.quantity = Set(item.quantity);
                    active.purchase_unit = Set(convert::unit_from_core(item.purchase_unit));
                    active.unit_cost = Set(item.unit_cost);
                    active.updated_at = Set(Utc::now().into());
                    result.push(active.update(&txn).await.map_err(db_err)?);
                }
                None => result.push(insert_po_item(&txn, po_id, item).await?),
            }
        }

        let states: Vec<ItemState> = result.iter().map(state_of).collect();
        let status = PurchaseService::derive_status(&states);
        let mut active: purchase_orders::ActiveModel = order.clone().into();
        active.status = Set(convert::po_status_from_core(status));
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        for change in &diff.changes {
            let product_id = match change {
                LineChange::Delta { key, .. }
                | LineChange::Reverse { key, .. }
                | LineChange::Apply { key, .. } => key.product_id,
            };
            self.catalog.spawn_refresh(self.db.clone(), product_id);
        }
        Ok(result)
    }

    /// Removes a single item from the order. Items with receipts are
    /// refused; receipt rows must never be orphaned.
    pub async fn delete_item(&self, po_id: Uuid, item_id: Uuid) -> Result<(), PurchasingError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let order = lock_po(&txn, po_id).await?;
        PurchaseService::validate_edit(convert::po_status_to_core(&order.status))?;

        let item = purchase_order_items::Entity::find_by_id(item_id)
            .filter(purchase_order_items::Column::PurchaseOrderId.eq(po_id))
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(PurchasingError::UnknownItem(item_id))?;
        PurchaseService::validate_delete_item(&state_of(&item))?;

        purchase_order_items::Entity::delete_by_id(item_id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    /// Cancels a purchase order that never received stock.
    pub async fn cancel(&self, po_id: Uuid) -> Result<purchase_orders::Model, PurchasingError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let order = lock_po(&txn, po_id).await?;
        PurchaseService::validate_cancel(convert::po_status_to_core(&order.status))?;

        let mut active: purchase_orders::ActiveModel = order.into();
        active.status = Set(db_enums::PurchaseOrderStatus::Cancelled);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        info!(purchase_order_id = %po_id, "purchase order cancelled");
        Ok(updated)
    }
}

fn state_of(item: &purchase_order_items::Model) -> ItemState {
    ItemState {
        item_id: item.id,
        quantity: item.quantity,
        received_quantity: item.received_quantity,
    }
}

fn po_key(order: &purchase_orders::Model, product_id: Uuid) -> StockKey {
    // Consignment stock is keyed to the owning factory.
    let factory_id = match order.ownership_type {
        OwnershipType::Consignment => Some(order.supplier_id),
        OwnershipType::Owned => None,
    };
    StockKey {
        product_id,
        warehouse_id: order.warehouse_id,
        ownership_type: order.ownership_type.clone(),
        factory_id,
    }
}

async fn lock_po(
    txn: &DatabaseTransaction,
    po_id: Uuid,
) -> Result<purchase_orders::Model, PurchasingError> {
    purchase_orders::Entity::find_by_id(po_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(PurchasingError::NotFound(po_id))
}

async fn items_of<C: sea_orm::ConnectionTrait>(
    conn: &C,
    po_id: Uuid,
) -> Result<Vec<purchase_order_items::Model>, PurchasingError> {
    purchase_order_items::Entity::find()
        .filter(purchase_order_items::Column::PurchaseOrderId.eq(po_id))
        .order_by_asc(purchase_order_items::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(db_err)
}

async fn insert_po_item(
    txn: &DatabaseTransaction,
    po_id: Uuid,
    item: &NewPurchaseOrderItem,
) -> Result<purchase_order_items::Model, PurchasingError> {
    if item.quantity <= Decimal::ZERO {
        return Err(PurchasingError::NonPositiveQuantity(item.quantity));
    }
    let now = Utc::now();
    let row = purchase_order_items::ActiveModel {
        id: Set(Uuid::now_v7()),
        purchase_order_id: Set(po_id),
        product_id: Set(item.product_id),
        quantity: Set(item.quantity),
        purchase_unit: Set(convert::unit_from_core(item.purchase_unit)),
        unit_cost: Set(item.unit_cost),
        received_quantity: Set(Decimal::ZERO),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    row.insert(txn).await.map_err(db_err)
}

/// Ordered quantity of an incoming line, converted to the stocking unit.
async fn ordered_stock_quantity(
    txn: &DatabaseTransaction,
    item: &NewPurchaseOrderItem,
) -> Result<Decimal, PurchasingError> {
    let product = products::Entity::find_by_id(item.product_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(PurchasingError::UnknownItem(item.product_id))?;
    let packaging = convert::packaging_of(&product);
    let derived = stock::derived_pieces_per_box(txn, item.product_id, &packaging).await?;
    Ok(UnitService::to_stocking_unit(
        &packaging,
        item.quantity,
        item.purchase_unit,
        derived,
    )?)
}

async fn convert_quantity(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    quantity: Decimal,
    unit: &db_enums::StockingUnit,
) -> Result<Decimal, PurchasingError> {
    let product = products::Entity::find_by_id(product_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(PurchasingError::UnknownItem(product_id))?;
    let packaging = convert::packaging_of(&product);
    let derived = stock::derived_pieces_per_box(txn, product_id, &packaging).await?;
    Ok(UnitService::to_stocking_unit(
        &packaging,
        quantity,
        convert::unit_to_core(unit),
        derived,
    )?)
}

/// Applies one diff-produced ledger adjustment under the order's
/// ownership key.
async fn apply_change(
    txn: &DatabaseTransaction,
    order: &purchase_orders::Model,
    change: &LineChange,
    actor: Uuid,
) -> Result<(), PurchasingError> {
    match change {
        LineChange::Delta { key, delta } => {
            if *delta > Decimal::ZERO {
                restock_key(
                    txn,
                    &diff_key(order, key),
                    *delta,
                    ReferenceType::PurchaseOrder,
                    order.id,
                    actor,
                )
                .await?;
            } else {
                stock_out_key(
                    txn,
                    &diff_key(order, key),
                    -*delta,
                    ReferenceType::PurchaseOrder,
                    order.id,
                    actor,
                )
                .await?;
            }
        }
        LineChange::Reverse { key, quantity } => {
            stock_out_key(
                txn,
                &diff_key(order, key),
                *quantity,
                ReferenceType::PurchaseOrder,
                order.id,
                actor,
            )
            .await?;
        }
        LineChange::Apply { key, quantity } => {
            restock_key(
                txn,
                &diff_key(order, key),
                *quantity,
                ReferenceType::PurchaseOrder,
                order.id,
                actor,
            )
            .await?;
        }
    }
    Ok(())
}

fn diff_key(order: &purchase_orders::Model, key: &ItemKey) -> StockKey {
    let mut stock_key = po_key(order, key.product_id);
    stock_key.warehouse_id = key.warehouse_id;
    stock_key
}

async fn restock_key(
    txn: &DatabaseTransaction,
    key: &StockKey,
    quantity: Decimal,
    reference_type: ReferenceType,
    reference_id: Uuid,
    actor: Uuid,
) -> Result<(), PurchasingError> {
    let record = lock_record(txn, key).await?;
    let levels = StockService::restock(levels_of(&record), quantity)?;
    persist_levels(txn, record, levels).await?;
    append_movement(
        txn,
        key,
        MovementType::In,
        quantity,
        reference_type,
        reference_id,
        actor,
    )
    .await?;
    Ok(())
}

async fn stock_out_key(
    txn: &DatabaseTransaction,
    key: &StockKey,
    quantity: Decimal,
    reference_type: ReferenceType,
    reference_id: Uuid,
    actor: Uuid,
) -> Result<(), PurchasingError> {
    let record = lock_record(txn, key).await?;
    let levels = StockService::stock_out(levels_of(&record), quantity)?;
    persist_levels(txn, record, levels).await?;
    append_movement(
        txn,
        key,
        MovementType::Out,
        -quantity,
        reference_type,
        reference_id,
        actor,
    )
    .await?;
    Ok(())
}
