//! Customer price resolution.
//!
//! A fixed-priority waterfall consulted at order-item insertion time:
//! contract price, brand rule, assigned price list, catalog base price.
//! Resolution is pure and re-evaluated per item; inserted items freeze
//! whatever price was resolved.

pub mod error;
pub mod service;
pub mod types;

pub use error::PricingError;
pub use service::PriceResolver;
pub use types::{PriceCandidates, PriceSource, ResolvedPrice};
