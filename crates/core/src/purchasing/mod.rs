//! Purchase order and goods receipt business rules.
//!
//! A purchase order records intent; goods receipts record what
//! actually arrived. The fulfillment status is never stored
//! independently, it is derived from the received-vs-ordered totals.

pub mod diff;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use diff::{ItemKey, ItemLine, LineChange, PoDiff};
pub use error::PurchasingError;
pub use service::{ItemState, PurchaseService};
pub use types::{PurchaseOrderStatus, ReceiptLine};
