//! Postgres enum mappings shared by the entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The unit a product's stock is counted in.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stocking_unit")]
pub enum StockingUnit {
    /// Individual pieces.
    #[sea_orm(string_value = "piece")]
    Piece,
    /// Boxes (colis).
    #[sea_orm(string_value = "box")]
    Box,
    /// Pallets.
    #[sea_orm(string_value = "pallet")]
    Pallet,
    /// Square metres.
    #[sea_orm(string_value = "square_meter")]
    SquareMeter,
}

/// Customer classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "customer_kind")]
pub enum CustomerKind {
    /// Walk-in cash customer.
    #[sea_orm(string_value = "retail")]
    Retail,
    /// Account customer with a running balance.
    #[sea_orm(string_value = "wholesale")]
    Wholesale,
}

/// Sales order status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
pub enum OrderStatus {
    /// Editable, reservations only.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Stock committed, accounting recorded.
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Being prepared for shipment.
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Left the warehouse.
    #[sea_orm(string_value = "shipped")]
    Shipped,
    /// Received by the customer.
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Terminal.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Purchase order fulfillment status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "purchase_order_status")]
pub enum PurchaseOrderStatus {
    /// Nothing received.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Partially received.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully received.
    #[sea_orm(string_value = "received")]
    Received,
    /// Cancelled before receiving.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Return lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "return_status")]
pub enum ReturnStatus {
    /// Recorded, no side effects yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Stock and accounting applied.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Refused.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Direction of an inventory ledger movement.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_type")]
pub enum MovementType {
    /// Stock entering the warehouse.
    #[sea_orm(string_value = "in")]
    In,
    /// Stock leaving the warehouse.
    #[sea_orm(string_value = "out")]
    Out,
    /// Manual correction.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

/// Who owns the stock held in a warehouse.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ownership_type")]
pub enum OwnershipType {
    /// Bought stock.
    #[sea_orm(string_value = "owned")]
    Owned,
    /// Consignment stock held for a factory.
    #[sea_orm(string_value = "consignment")]
    Consignment,
}

/// Which waterfall tier priced an order line.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "price_source")]
pub enum PriceSource {
    /// Customer-specific contract price.
    #[sea_orm(string_value = "contract")]
    Contract,
    /// Customer x brand x size rule.
    #[sea_orm(string_value = "brand_rule")]
    BrandRule,
    /// Assigned price list.
    #[sea_orm(string_value = "price_list")]
    PriceList,
    /// Product base price.
    #[sea_orm(string_value = "base")]
    Base,
    /// Operator-supplied override.
    #[sea_orm(string_value = "manual")]
    Manual,
}

/// The business event a cash transaction records.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_transaction_kind")]
pub enum CashTransactionKind {
    /// Sale.
    #[sea_orm(string_value = "vente")]
    Vente,
    /// Purchase.
    #[sea_orm(string_value = "achat")]
    Achat,
    /// Customer payment.
    #[sea_orm(string_value = "versement")]
    Versement,
    /// Supplier payment.
    #[sea_orm(string_value = "paiement")]
    Paiement,
    /// Customer return credit.
    #[sea_orm(string_value = "retour_vente")]
    RetourVente,
    /// Supplier return credit.
    #[sea_orm(string_value = "retour_achat")]
    RetourAchat,
}

/// Which side of the ledger a cash transaction touches.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "counterparty_kind")]
pub enum CounterpartyKind {
    /// Customer account.
    #[sea_orm(string_value = "customer")]
    Customer,
    /// Supplier account.
    #[sea_orm(string_value = "supplier")]
    Supplier,
}

/// Kind of supplier a purchase order is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "supplier_kind")]
pub enum SupplierKind {
    /// A tile brand.
    #[sea_orm(string_value = "brand")]
    Brand,
    /// A factory supplying consignment stock.
    #[sea_orm(string_value = "factory")]
    Factory,
}

/// The document an inventory or cash row points back at.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "reference_type")]
pub enum ReferenceType {
    /// Sales order.
    #[sea_orm(string_value = "order")]
    Order,
    /// Goods receipt against a purchase order.
    #[sea_orm(string_value = "goods_receipt")]
    GoodsReceipt,
    /// Purchase order (edits that move stock).
    #[sea_orm(string_value = "purchase_order")]
    PurchaseOrder,
    /// Customer return.
    #[sea_orm(string_value = "return")]
    Return,
    /// Supplier return.
    #[sea_orm(string_value = "purchase_return")]
    PurchaseReturn,
    /// Manual stock adjustment.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}
