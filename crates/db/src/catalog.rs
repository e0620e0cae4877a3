//! Catalogue read model.
//!
//! A moka-cached denormalized projection of product + aggregated stock
//! used by lookup-heavy screens. Refreshes run on `tokio::spawn` after
//! any inventory- or packaging-affecting operation; a failed refresh
//! leaves the previous entry in place and is logged, never propagated
//! to the triggering transaction.

use std::sync::Arc;

use moka::future::Cache;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tracing::warn;
use uuid::Uuid;

use crate::entities::{inventory_records, products};

/// Denormalized product + stock projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Product id.
    pub product_id: Uuid,
    /// Product SKU.
    pub sku: String,
    /// Product display name.
    pub name: String,
    /// Dimension string, when present.
    pub size: Option<String>,
    /// On-hand total across all warehouses, stocking unit.
    pub on_hand_total: Decimal,
    /// Reserved total across all warehouses.
    pub reserved_total: Decimal,
    /// Derived pallet count total.
    pub pallet_count: Decimal,
    /// Derived box count total.
    pub colis_count: Decimal,
}

impl CatalogEntry {
    /// On-hand minus reserved.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.on_hand_total - self.reserved_total
    }
}

/// Shared, cloneable cache over the catalogue projection.
#[derive(Clone)]
pub struct CatalogCache {
    cache: Cache<Uuid, Arc<CatalogEntry>>,
}

impl CatalogCache {
    /// Creates a cache bounded to `capacity` entries.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::new(capacity),
        }
    }

    /// Returns the cached projection for a product, loading it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the database error if the load fails.
    pub async fn get(
        &self,
        db: &DatabaseConnection,
        product_id: Uuid,
    ) -> Result<Option<Arc<CatalogEntry>>, DbErr> {
        if let Some(entry) = self.cache.get(&product_id).await {
            return Ok(Some(entry));
        }
        let Some(entry) = load_entry(db, product_id).await? else {
            return Ok(None);
        };
        let entry = Arc::new(entry);
        self.cache.insert(product_id, Arc::clone(&entry)).await;
        Ok(Some(entry))
    }

    /// Fire-and-forget refresh after a stock or packaging change.
    /// Failures keep the stale entry and are only logged.
    pub fn spawn_refresh(&self, db: DatabaseConnection, product_id: Uuid) {
        let cache = self.cache.clone();
        tokio::spawn(async move {
            match load_entry(&db, product_id).await {
                Ok(Some(entry)) => {
                    cache.insert(product_id, Arc::new(entry)).await;
                }
                Ok(None) => {
                    cache.invalidate(&product_id).await;
                }
                Err(err) => {
                    warn!(%product_id, error = %err, "catalog read-model refresh failed");
                }
            }
        });
    }

    /// Drops a product from the cache.
    pub async fn invalidate(&self, product_id: Uuid) {
        self.cache.invalidate(&product_id).await;
    }
}

async fn load_entry(
    db: &DatabaseConnection,
    product_id: Uuid,
) -> Result<Option<CatalogEntry>, DbErr> {
    let Some(product) = products::Entity::find_by_id(product_id).one(db).await? else {
        return Ok(None);
    };
    let records = inventory_records::Entity::find()
        .filter(inventory_records::Column::ProductId.eq(product_id))
        .all(db)
        .await?;

    let mut entry = CatalogEntry {
        product_id,
        sku: product.sku,
        name: product.name,
        size: product.size,
        on_hand_total: Decimal::ZERO,
        reserved_total: Decimal::ZERO,
        pallet_count: Decimal::ZERO,
        colis_count: Decimal::ZERO,
    };
    for record in &records {
        entry.on_hand_total += record.quantity_on_hand;
        entry.reserved_total += record.quantity_reserved;
        entry.pallet_count += record.pallet_count;
        entry.colis_count += record.colis_count;
    }
    Ok(Some(entry))
}
