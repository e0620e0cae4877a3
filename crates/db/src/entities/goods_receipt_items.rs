//! `SeaORM` Entity for goods_receipt_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "goods_receipt_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub goods_receipt_id: Uuid,
    pub purchase_order_item_id: Uuid,
    /// Received quantity in the purchase unit.
    pub quantity: Decimal,
    /// Converted quantity in the stocking unit, snapshot at posting.
    pub quantity_stock_unit: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::goods_receipts::Entity",
        from = "Column::GoodsReceiptId",
        to = "super::goods_receipts::Column::Id"
    )]
    GoodsReceipts,
    #[sea_orm(
        belongs_to = "super::purchase_order_items::Entity",
        from = "Column::PurchaseOrderItemId",
        to = "super::purchase_order_items::Column::Id"
    )]
    PurchaseOrderItems,
}

impl Related<super::goods_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoodsReceipts.def()
    }
}

impl Related<super::purchase_order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
