//! Core settlement logic for Tessera.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; the `tessera-db` crate wraps them in transactional boundaries.
//!
//! # Modules
//!
//! - `units` - Sale-unit to stocking-unit conversion (pieces, boxes, pallets, area)
//! - `pricing` - Customer price resolution waterfall
//! - `inventory` - Stock-level arithmetic: reserve, commit, release, restock, adjust
//! - `orders` - Sales order state machine and reversal planning
//! - `purchasing` - Purchase orders, goods receipts, and item-list diffing
//! - `returns` - Approval-gated customer and supplier return workflows
//! - `accounting` - Cash-transaction kinds and counterparty balance deltas

pub mod accounting;
pub mod inventory;
pub mod orders;
pub mod pricing;
pub mod purchasing;
pub mod returns;
pub mod units;
