//! Cash transaction ledger rules.
//!
//! The ledger is append-only; the running balance on a customer or
//! supplier is denormalized from it. Both sides go through one sign
//! convention so the two can never drift.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::AccountingError;
pub use service::AccountingService;
pub use types::{CashTransactionKind, CounterpartyKind};
