//! Conversions between the Postgres enum mappings and the core types.

use tessera_core::accounting::{CashTransactionKind, CounterpartyKind};
use tessera_core::orders::{CustomerKind, OrderStatus};
use tessera_core::pricing::PriceSource;
use tessera_core::purchasing::PurchaseOrderStatus;
use tessera_core::returns::ReturnStatus;
use tessera_core::units::{ProductPackaging, Unit};

use crate::entities::{products, sea_orm_active_enums as db_enums};

/// Maps a database stocking unit to the core unit.
#[must_use]
pub fn unit_to_core(unit: &db_enums::StockingUnit) -> Unit {
    match unit {
        db_enums::StockingUnit::Piece => Unit::Piece,
        db_enums::StockingUnit::Box => Unit::Box,
        db_enums::StockingUnit::Pallet => Unit::Pallet,
        db_enums::StockingUnit::SquareMeter => Unit::SquareMeter,
    }
}

/// Maps a core unit to the database stocking unit.
#[must_use]
pub fn unit_from_core(unit: Unit) -> db_enums::StockingUnit {
    match unit {
        Unit::Piece => db_enums::StockingUnit::Piece,
        Unit::Box => db_enums::StockingUnit::Box,
        Unit::Pallet => db_enums::StockingUnit::Pallet,
        Unit::SquareMeter => db_enums::StockingUnit::SquareMeter,
    }
}

/// Maps a database order status to the core status.
#[must_use]
pub fn order_status_to_core(status: &db_enums::OrderStatus) -> OrderStatus {
    match status {
        db_enums::OrderStatus::Pending => OrderStatus::Pending,
        db_enums::OrderStatus::Confirmed => OrderStatus::Confirmed,
        db_enums::OrderStatus::Processing => OrderStatus::Processing,
        db_enums::OrderStatus::Shipped => OrderStatus::Shipped,
        db_enums::OrderStatus::Delivered => OrderStatus::Delivered,
        db_enums::OrderStatus::Cancelled => OrderStatus::Cancelled,
    }
}

/// Maps a core order status to the database status.
#[must_use]
pub fn order_status_from_core(status: OrderStatus) -> db_enums::OrderStatus {
    match status {
        OrderStatus::Pending => db_enums::OrderStatus::Pending,
        OrderStatus::Confirmed => db_enums::OrderStatus::Confirmed,
        OrderStatus::Processing => db_enums::OrderStatus::Processing,
        OrderStatus::Shipped => db_enums::OrderStatus::Shipped,
        OrderStatus::Delivered => db_enums::OrderStatus::Delivered,
        OrderStatus::Cancelled => db_enums::OrderStatus::Cancelled,
    }
}

/// Maps a database customer kind to the core kind.
#[must_use]
pub fn customer_kind_to_core(kind: &db_enums::CustomerKind) -> CustomerKind {
    match kind {
        db_enums::CustomerKind::Retail => CustomerKind::Retail,
        db_enums::CustomerKind::Wholesale => CustomerKind::Wholesale,
    }
}

/// Maps a database purchase order status to the core status.
#[must_use]
pub fn po_status_to_core(status: &db_enums::PurchaseOrderStatus) -> PurchaseOrderStatus {
    match status {
        db_enums::PurchaseOrderStatus::Pending => PurchaseOrderStatus::Pending,
        db_enums::PurchaseOrderStatus::Partial => PurchaseOrderStatus::Partial,
        db_enums::PurchaseOrderStatus::Received => PurchaseOrderStatus::Received,
        db_enums::PurchaseOrderStatus::Cancelled => PurchaseOrderStatus::Cancelled,
    }
}

/// Maps a core purchase order status to the database status.
#[must_use]
pub fn po_status_from_core(status: PurchaseOrderStatus) -> db_enums::PurchaseOrderStatus {
    match status {
        PurchaseOrderStatus::Pending => db_enums::PurchaseOrderStatus::Pending,
        PurchaseOrderStatus::Partial => db_enums::PurchaseOrderStatus::Partial,
        PurchaseOrderStatus::Received => db_enums::PurchaseOrderStatus::Received,
        PurchaseOrderStatus::Cancelled => db_enums::PurchaseOrderStatus::Cancelled,
    }
}

/// Maps a database return status to the core status.
#[must_use]
pub fn return_status_to_core(status: &db_enums::ReturnStatus) -> ReturnStatus {
    match status {
        db_enums::ReturnStatus::Pending => ReturnStatus::Pending,
        db_enums::ReturnStatus::Approved => ReturnStatus::Approved,
        db_enums::ReturnStatus::Rejected => ReturnStatus::Rejected,
    }
}

/// Maps a core price source to the database enum.
#[must_use]
pub fn price_source_from_core(source: PriceSource) -> db_enums::PriceSource {
    match source {
        PriceSource::Contract => db_enums::PriceSource::Contract,
        PriceSource::BrandRule => db_enums::PriceSource::BrandRule,
        PriceSource::PriceList => db_enums::PriceSource::PriceList,
        PriceSource::Base => db_enums::PriceSource::Base,
    }
}

/// Maps a core cash transaction kind to the database enum.
#[must_use]
pub fn cash_kind_from_core(kind: CashTransactionKind) -> db_enums::CashTransactionKind {
    match kind {
        CashTransactionKind::Vente => db_enums::CashTransactionKind::Vente,
        CashTransactionKind::Achat => db_enums::CashTransactionKind::Achat,
        CashTransactionKind::Versement => db_enums::CashTransactionKind::Versement,
        CashTransactionKind::Paiement => db_enums::CashTransactionKind::Paiement,
        CashTransactionKind::RetourVente => db_enums::CashTransactionKind::RetourVente,
        CashTransactionKind::RetourAchat => db_enums::CashTransactionKind::RetourAchat,
    }
}

/// Maps a core counterparty kind to the database enum.
#[must_use]
pub fn counterparty_from_core(kind: CounterpartyKind) -> db_enums::CounterpartyKind {
    match kind {
        CounterpartyKind::Customer => db_enums::CounterpartyKind::Customer,
        CounterpartyKind::Supplier => db_enums::CounterpartyKind::Supplier,
    }
}

/// Projects a product row into the packaging metadata the unit
/// conversion resolver needs.
#[must_use]
pub fn packaging_of(product: &products::Model) -> ProductPackaging {
    ProductPackaging {
        stocking_unit: unit_to_core(&product.stocking_unit),
        dimensions: product.size.clone(),
        pieces_per_box: product.pieces_per_box,
        boxes_per_pallet: product.boxes_per_pallet,
    }
}
