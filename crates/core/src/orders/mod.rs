//! Sales order state machine.
//!
//! Orders move pending → confirmed → processing/shipped/delivered, or
//! pending → cancelled. Each transition has asymmetric side effects on
//! stock and money; the edit path reverses exactly the effects applied for
//! the *current* status and forces the order back to pending.

pub mod error;
pub mod reversal;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::OrderError;
pub use reversal::{ItemSnapshot, ReversalAction, ReversalPlan, StockReversal};
pub use service::OrderService;
pub use types::{CustomerKind, LineAmounts, OrderStatus, OrderTotals};
