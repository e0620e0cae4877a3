//! `SeaORM` entity definitions.

pub mod sea_orm_active_enums;

pub mod brand_price_rules;
pub mod brands;
pub mod cash_transactions;
pub mod contract_prices;
pub mod customers;
pub mod factories;
pub mod goods_receipt_items;
pub mod goods_receipts;
pub mod inventory_records;
pub mod inventory_transactions;
pub mod order_items;
pub mod orders;
pub mod price_list_items;
pub mod price_lists;
pub mod products;
pub mod purchase_order_items;
pub mod purchase_orders;
pub mod purchase_return_items;
pub mod purchase_returns;
pub mod return_items;
pub mod returns;
pub mod suppliers;
pub mod warehouses;
