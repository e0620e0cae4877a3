//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the settlement schema
//! - Repository abstractions wrapping the pure `tessera-core` services
//!   in transactional boundaries
//! - The moka-backed catalogue read model
//! - Database migrations

pub mod catalog;
pub mod entities;
pub mod migration;
pub mod repositories;

pub use catalog::{CatalogCache, CatalogEntry};
pub use repositories::{
    AccountingRepository, CashRecordInput, InventoryRepository, NewOrderItem,
    NewPurchaseOrderItem, NewReturnLine, OrderRepository, OrderWithItems, PricingRepository,
    PurchaseRepository, ReturnRepository, StockKey,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
