//! Stock-level arithmetic for the inventory ledger.
//!
//! Pure reserve/commit/release/restock/adjust operations over a stock
//! record's quantities, with the clamping and derived-count rules the
//! repositories apply inside their transactional boundaries.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::InventoryError;
pub use service::StockService;
pub use types::{DerivedCounts, StockLevels};
