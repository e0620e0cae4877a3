//! Transaction-scoped inventory helpers.
//!
//! Every stock-affecting repository operation runs these inside its
//! own database transaction: lock (or lazily create) the inventory
//! record, apply a pure [`StockService`] function, persist the new
//! levels, and append the audit row. Sharing one implementation keeps
//! the locking discipline identical across orders, purchasing and
//! returns.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

use tessera_core::inventory::{InventoryError, StockLevels};
use tessera_core::units::{ProductPackaging, Unit, UnitService};

use crate::entities::{
    inventory_records, inventory_transactions, order_items,
    sea_orm_active_enums::{MovementType, OwnershipType, ReferenceType, StockingUnit},
};

/// How many historical box-unit order lines feed the derived ratio.
const DERIVED_RATIO_SAMPLE: u64 = 20;

/// The four-part key identifying one inventory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockKey {
    /// Product being stocked.
    pub product_id: Uuid,
    /// Warehouse holding the stock.
    pub warehouse_id: Uuid,
    /// Who owns the stock.
    pub ownership_type: OwnershipType,
    /// Owning factory for consignment stock.
    pub factory_id: Option<Uuid>,
}

impl StockKey {
    /// Owned stock for a (product, warehouse) pair, the common case.
    #[must_use]
    pub fn owned(product_id: Uuid, warehouse_id: Uuid) -> Self {
        Self {
            product_id,
            warehouse_id,
            ownership_type: OwnershipType::Owned,
            factory_id: None,
        }
    }
}

/// Maps a database error onto the inventory error space, surfacing
/// lock-wait timeouts distinctly so callers can advise a retry.
pub(crate) fn map_stock_err(err: DbErr) -> InventoryError {
    let message = err.to_string();
    if message.contains("lock timeout") || message.contains("55P03") {
        InventoryError::LockTimeout
    } else {
        InventoryError::Database(message)
    }
}

/// Bounds lock waits for the remainder of the transaction.
pub(crate) async fn set_lock_timeout(
    txn: &DatabaseTransaction,
    secs: u64,
) -> Result<(), InventoryError> {
    txn.execute_unprepared(&format!("SET LOCAL lock_timeout = '{secs}s'"))
        .await
        .map_err(map_stock_err)?;
    Ok(())
}

/// Locks the inventory record for `key` with `SELECT ... FOR UPDATE`,
/// lazily inserting a zeroed row first if none exists. Records are
/// zeroed on reversal, never deleted, so the lazy insert happens at
/// most once per key.
pub(crate) async fn lock_record(
    txn: &DatabaseTransaction,
    key: &StockKey,
) -> Result<inventory_records::Model, InventoryError> {
    if let Some(record) = find_locked(txn, key).await? {
        return Ok(record);
    }

    debug!(product_id = %key.product_id, warehouse_id = %key.warehouse_id,
        "creating zeroed inventory record");
    let now = Utc::now();
    let record = inventory_records::ActiveModel {
        id: Set(Uuid::now_v7()),
        product_id: Set(key.product_id),
        warehouse_id: Set(key.warehouse_id),
        ownership_type: Set(key.ownership_type.clone()),
        factory_id: Set(key.factory_id),
        quantity_on_hand: Set(Decimal::ZERO),
        quantity_reserved: Set(Decimal::ZERO),
        pallet_count: Set(Decimal::ZERO),
        colis_count: Set(Decimal::ZERO),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    record.insert(txn).await.map_err(map_stock_err)?;

    find_locked(txn, key)
        .await?
        .ok_or(InventoryError::RecordNotFound)
}

async fn find_locked(
    txn: &DatabaseTransaction,
    key: &StockKey,
) -> Result<Option<inventory_records::Model>, InventoryError> {
    let mut query = inventory_records::Entity::find()
        .filter(inventory_records::Column::ProductId.eq(key.product_id))
        .filter(inventory_records::Column::WarehouseId.eq(key.warehouse_id))
        .filter(inventory_records::Column::OwnershipType.eq(key.ownership_type.clone()));
    query = match key.factory_id {
        Some(factory_id) => query.filter(inventory_records::Column::FactoryId.eq(factory_id)),
        None => query.filter(inventory_records::Column::FactoryId.is_null()),
    };
    query
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(map_stock_err)
}

/// Reads the levels out of a locked record.
#[must_use]
pub(crate) fn levels_of(record: &inventory_records::Model) -> StockLevels {
    StockLevels {
        on_hand: record.quantity_on_hand,
        reserved: record.quantity_reserved,
        pallet_count: record.pallet_count,
        colis_count: record.colis_count,
    }
}

/// Persists new levels onto a previously locked record.
pub(crate) async fn persist_levels(
    txn: &DatabaseTransaction,
    record: inventory_records::Model,
    levels: StockLevels,
) -> Result<inventory_records::Model, InventoryError> {
    let mut active: inventory_records::ActiveModel = record.into();
    active.quantity_on_hand = Set(levels.on_hand);
    active.quantity_reserved = Set(levels.reserved);
    active.pallet_count = Set(levels.pallet_count);
    active.colis_count = Set(levels.colis_count);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await.map_err(map_stock_err)
}

/// Appends one immutable row to the inventory movement audit trail.
pub(crate) async fn append_movement(
    txn: &DatabaseTransaction,
    key: &StockKey,
    movement_type: MovementType,
    quantity: Decimal,
    reference_type: ReferenceType,
    reference_id: Uuid,
    actor: Uuid,
) -> Result<(), InventoryError> {
    let row = inventory_transactions::ActiveModel {
        id: Set(Uuid::now_v7()),
        product_id: Set(key.product_id),
        warehouse_id: Set(key.warehouse_id),
        movement_type: Set(movement_type),
        quantity: Set(quantity),
        reference_type: Set(reference_type),
        reference_id: Set(reference_id),
        created_by: Set(actor),
        created_at: Set(Utc::now().into()),
    };
    row.insert(txn).await.map_err(map_stock_err)?;
    Ok(())
}

/// Estimates pieces-per-box from recent box-unit order lines when the
/// catalog ratio is missing. Returns `None` when the explicit ratio
/// makes the fallback unreachable, or when there is no usable history,
/// in which case conversion fails loudly upstream.
pub(crate) async fn derived_pieces_per_box(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    packaging: &ProductPackaging,
) -> Result<Option<Decimal>, InventoryError> {
    if packaging.pieces_per_box > Decimal::ZERO {
        return Ok(None);
    }

    let lines = order_items::Entity::find()
        .filter(order_items::Column::ProductId.eq(product_id))
        .filter(order_items::Column::SaleUnit.eq(StockingUnit::Box))
        .order_by_desc(order_items::Column::CreatedAt)
        .limit(DERIVED_RATIO_SAMPLE)
        .all(txn)
        .await
        .map_err(map_stock_err)?;

    let mut total_stock = Decimal::ZERO;
    let mut total_boxes = Decimal::ZERO;
    for line in &lines {
        if line.quantity > Decimal::ZERO && line.quantity_stock_unit > Decimal::ZERO {
            total_stock += line.quantity_stock_unit;
            total_boxes += line.quantity;
        }
    }
    if total_boxes <= Decimal::ZERO {
        return Ok(None);
    }
    let stock_per_box = total_stock / total_boxes;

    // stock-per-box back to pieces-per-box via the stocking unit.
    let pieces = match packaging.stocking_unit {
        Unit::Piece => Some(stock_per_box),
        Unit::SquareMeter => UnitService::area_per_piece(packaging)
            .filter(|area| *area > Decimal::ZERO)
            .map(|area| stock_per_box / area),
        Unit::Box | Unit::Pallet => None,
    };
    Ok(pieces.filter(|p| *p > Decimal::ZERO))
}
