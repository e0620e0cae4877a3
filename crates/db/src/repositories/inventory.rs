//! Inventory repository.
//!
//! Each public operation opens its own transaction, bounds lock waits,
//! locks the inventory record, applies the pure [`StockService`]
//! function, persists the levels and (for physical movements) appends
//! the audit row. Reservations and releases move no physical stock and
//! therefore leave no audit trail.

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use uuid::Uuid;

use tessera_core::inventory::{InventoryError, StockLevels, StockService};
use tessera_shared::config::EngineConfig;
use tessera_shared::types::round_qty;

use crate::catalog::CatalogCache;
use crate::entities::sea_orm_active_enums::{MovementType, ReferenceType};
use crate::entities::products;

use super::stock::{
    self, append_movement, levels_of, lock_record, map_stock_err, persist_levels,
    set_lock_timeout, StockKey,
};

/// Repository over inventory records and their audit trail.
#[derive(Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
    catalog: CatalogCache,
    lock_timeout_secs: u64,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, catalog: CatalogCache, engine: &EngineConfig) -> Self {
        Self {
            db,
            catalog,
            lock_timeout_secs: engine.lock_timeout_secs,
        }
    }

    /// Current levels for a stock key, lazily creating the zeroed
    /// record on first read.
    pub async fn levels(&self, key: &StockKey) -> Result<StockLevels, InventoryError> {
        let txn = self.db.begin().await.map_err(map_stock_err)?;
        let record = lock_record(&txn, key).await?;
        let levels = levels_of(&record);
        txn.commit().await.map_err(map_stock_err)?;
        Ok(levels)
    }

    /// Reserves stock for a pending order line.
    pub async fn reserve(
        &self,
        key: &StockKey,
        quantity: Decimal,
    ) -> Result<StockLevels, InventoryError> {
        self.apply(key, |levels| StockService::reserve(levels, quantity))
            .await
    }

    /// Releases a reservation.
    pub async fn release(
        &self,
        key: &StockKey,
        quantity: Decimal,
    ) -> Result<StockLevels, InventoryError> {
        self.apply(key, |levels| StockService::release(levels, quantity))
            .await
    }

    /// Commits reserved stock out of the warehouse and records the
    /// outbound movement.
    #[allow(clippy::too_many_arguments)]
    pub async fn commit(
        &self,
        key: &StockKey,
        quantity: Decimal,
        pallet_delta: Decimal,
        colis_delta: Decimal,
        reference_type: ReferenceType,
        reference_id: Uuid,
        actor: Uuid,
    ) -> Result<StockLevels, InventoryError> {
        let txn = self.db.begin().await.map_err(map_stock_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;
        let record = lock_record(&txn, key).await?;
        let levels =
            StockService::commit(levels_of(&record), quantity, pallet_delta, colis_delta)?;
        persist_levels(&txn, record, levels).await?;
        append_movement(
            &txn,
            key,
            MovementType::Out,
            -quantity,
            reference_type,
            reference_id,
            actor,
        )
        .await?;
        txn.commit().await.map_err(map_stock_err)?;
        self.catalog.spawn_refresh(self.db.clone(), key.product_id);
        Ok(levels)
    }

    /// Adds stock back into the warehouse (receipts, approved customer
    /// returns, order-edit reversal) and records the inbound movement.
    #[allow(clippy::too_many_arguments)]
    pub async fn restock(
        &self,
        key: &StockKey,
        quantity: Decimal,
        pallet_delta: Decimal,
        colis_delta: Decimal,
        reference_type: ReferenceType,
        reference_id: Uuid,
        actor: Uuid,
    ) -> Result<StockLevels, InventoryError> {
        let txn = self.db.begin().await.map_err(map_stock_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;
        let record = lock_record(&txn, key).await?;
        let mut levels = StockService::restock(levels_of(&record), quantity)?;
        levels.pallet_count = round_qty(levels.pallet_count + pallet_delta);
        levels.colis_count = round_qty(levels.colis_count + colis_delta);
        persist_levels(&txn, record, levels).await?;
        append_movement(
            &txn,
            key,
            MovementType::In,
            quantity,
            reference_type,
            reference_id,
            actor,
        )
        .await?;
        txn.commit().await.map_err(map_stock_err)?;
        self.catalog.spawn_refresh(self.db.clone(), key.product_id);
        Ok(levels)
    }

    /// Deducts on-hand stock without a prior reservation and records
    /// the outbound movement. Fails instead of clamping when short.
    pub async fn stock_out(
        &self,
        key: &StockKey,
        quantity: Decimal,
        reference_type: ReferenceType,
        reference_id: Uuid,
        actor: Uuid,
    ) -> Result<StockLevels, InventoryError> {
        let txn = self.db.begin().await.map_err(map_stock_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;
        let record = lock_record(&txn, key).await?;
        let levels = StockService::stock_out(levels_of(&record), quantity)?;
        persist_levels(&txn, record, levels).await?;
        append_movement(
            &txn,
            key,
            MovementType::Out,
            -quantity,
            reference_type,
            reference_id,
            actor,
        )
        .await?;
        txn.commit().await.map_err(map_stock_err)?;
        self.catalog.spawn_refresh(self.db.clone(), key.product_id);
        Ok(levels)
    }

    /// Applies a signed manual correction, rederives the pallet/colis
    /// counts from the packaging ratios, and records the adjustment.
    pub async fn adjust(
        &self,
        key: &StockKey,
        delta: Decimal,
        actor: Uuid,
    ) -> Result<StockLevels, InventoryError> {
        let txn = self.db.begin().await.map_err(map_stock_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;
        let record = lock_record(&txn, key).await?;
        let mut levels = StockService::adjust(levels_of(&record), delta)?;

        let product = products::Entity::find_by_id(key.product_id)
            .one(&txn)
            .await
            .map_err(map_stock_err)?
            .ok_or(InventoryError::RecordNotFound)?;
        let packaging = super::convert::packaging_of(&product);
        let derived = stock::derived_pieces_per_box(&txn, key.product_id, &packaging).await?;
        match StockService::derived_counts(levels.on_hand, &packaging, derived) {
            Some(counts) => {
                levels.pallet_count = counts.pallet_count;
                levels.colis_count = counts.colis_count;
            }
            None => {
                levels.pallet_count = Decimal::ZERO;
                levels.colis_count = Decimal::ZERO;
            }
        }

        persist_levels(&txn, record, levels).await?;
        append_movement(
            &txn,
            key,
            MovementType::Adjustment,
            delta,
            ReferenceType::Adjustment,
            Uuid::now_v7(),
            actor,
        )
        .await?;
        txn.commit().await.map_err(map_stock_err)?;
        self.catalog.spawn_refresh(self.db.clone(), key.product_id);
        Ok(levels)
    }

    /// Runs a reservation-side operation (no audit trail) in its own
    /// transaction.
    async fn apply<F>(&self, key: &StockKey, op: F) -> Result<StockLevels, InventoryError>
    where
        F: FnOnce(StockLevels) -> Result<StockLevels, InventoryError>,
    {
        let txn = self.db.begin().await.map_err(map_stock_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;
        let record = lock_record(&txn, key).await?;
        let levels = op(levels_of(&record))?;
        persist_levels(&txn, record, levels).await?;
        txn.commit().await.map_err(map_stock_err)?;
        self.catalog.spawn_refresh(self.db.clone(), key.product_id);
        Ok(levels)
    }
}
