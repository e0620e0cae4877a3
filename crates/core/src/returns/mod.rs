//! Customer and supplier return business rules.
//!
//! Both directions share one two-phase lifecycle: creation records
//! intent with no side effects, and approval is the single one-way
//! gate that moves stock and money.

pub mod error;
pub mod service;
pub mod types;

pub use error::ReturnError;
pub use service::{ReturnEffect, ReturnService};
pub use types::{ReturnDirection, ReturnLine, ReturnStatus};
