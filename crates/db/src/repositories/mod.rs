//! Repository abstractions for data access.
//!
//! Repositories wrap the pure core services inside database
//! transactions, hiding the `SeaORM` implementation details from the
//! rest of the application. Stock-affecting helpers that must run
//! inside a caller's transaction live in [`stock`] and are shared by
//! every repository that moves inventory.

pub mod accounting;
pub mod convert;
pub mod inventory;
pub mod order;
pub mod pricing;
pub mod purchase;
pub mod returns;
pub mod stock;

pub use accounting::{AccountingRepository, CashRecordInput};
pub use inventory::InventoryRepository;
pub use order::{NewOrderItem, OrderRepository, OrderWithItems};
pub use pricing::PricingRepository;
pub use purchase::{NewPurchaseOrderItem, PurchaseRepository};
pub use returns::{NewReturnLine, ReturnRepository};
pub use stock::StockKey;
