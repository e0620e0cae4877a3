//! Sale-unit to stocking-unit conversion.
//!
//! Tiles are bought and sold in pieces, boxes, and pallets, but stocked in
//! an area unit (m²) derived from the product's dimension string. This
//! module implements the single conversion path used by every state-machine
//! transition that needs a stocking-unit delta.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use error::ConversionError;
pub use service::UnitService;
pub use types::{ProductPackaging, Unit};
