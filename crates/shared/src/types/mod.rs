//! Common types used across the application.

pub mod pagination;
pub mod quantity;

pub use pagination::{PageRequest, PageResponse};
pub use quantity::{round_money, round_qty, MONEY_DP, QTY_DP};
