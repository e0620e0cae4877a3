//! `SeaORM` Entity for order_items table.
//!
//! Lines freeze unit price, price source, cost price and the
//! stocking-unit conversion at insertion time; later catalog edits
//! never rewrite history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PriceSource, StockingUnit};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    /// Quantity in the sale unit the operator entered.
    pub quantity: Decimal,
    pub sale_unit: StockingUnit,
    pub unit_price: Decimal,
    pub price_source: PriceSource,
    pub discount_pct: Decimal,
    /// Converted quantity in the product's stocking unit.
    pub quantity_stock_unit: Decimal,
    /// Operator-entered pallet count for the packaging counters.
    pub pallet_count: Decimal,
    /// Operator-entered box count for the packaging counters.
    pub colis_count: Decimal,
    /// Cost price snapshot frozen at insertion.
    pub cost_price: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
