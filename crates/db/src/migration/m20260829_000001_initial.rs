//! Initial database migration.
//!
//! Creates all enums, tables and indexes for the settlement engine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CATALOG
        // ============================================================
        db.execute_unprepared(BRANDS_SQL).await?;
        db.execute_unprepared(FACTORIES_SQL).await?;
        db.execute_unprepared(WAREHOUSES_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;

        // ============================================================
        // PART 3: PARTNERS & PRICING
        // ============================================================
        db.execute_unprepared(PRICE_LISTS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(SUPPLIERS_SQL).await?;
        db.execute_unprepared(PRICE_LIST_ITEMS_SQL).await?;
        db.execute_unprepared(CONTRACT_PRICES_SQL).await?;
        db.execute_unprepared(BRAND_PRICE_RULES_SQL).await?;

        // ============================================================
        // PART 4: INVENTORY LEDGER
        // ============================================================
        db.execute_unprepared(INVENTORY_RECORDS_SQL).await?;
        db.execute_unprepared(INVENTORY_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 5: ORDERS
        // ============================================================
        db.execute_unprepared(ORDERS_SQL).await?;
        db.execute_unprepared(ORDER_ITEMS_SQL).await?;

        // ============================================================
        // PART 6: PURCHASING
        // ============================================================
        db.execute_unprepared(PURCHASE_ORDERS_SQL).await?;
        db.execute_unprepared(PURCHASE_ORDER_ITEMS_SQL).await?;
        db.execute_unprepared(GOODS_RECEIPTS_SQL).await?;
        db.execute_unprepared(GOODS_RECEIPT_ITEMS_SQL).await?;

        // ============================================================
        // PART 7: RETURNS
        // ============================================================
        db.execute_unprepared(RETURNS_SQL).await?;
        db.execute_unprepared(RETURN_ITEMS_SQL).await?;
        db.execute_unprepared(PURCHASE_RETURNS_SQL).await?;
        db.execute_unprepared(PURCHASE_RETURN_ITEMS_SQL).await?;

        // ============================================================
        // PART 8: ACCOUNTING LEDGER
        // ============================================================
        db.execute_unprepared(CASH_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 9: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE stocking_unit AS ENUM ('piece', 'box', 'pallet', 'square_meter');

CREATE TYPE customer_kind AS ENUM ('retail', 'wholesale');

CREATE TYPE order_status AS ENUM (
    'pending',
    'confirmed',
    'processing',
    'shipped',
    'delivered',
    'cancelled'
);

CREATE TYPE purchase_order_status AS ENUM (
    'pending',
    'partial',
    'received',
    'cancelled'
);

CREATE TYPE return_status AS ENUM ('pending', 'approved', 'rejected');

CREATE TYPE movement_type AS ENUM ('in', 'out', 'adjustment');

CREATE TYPE ownership_type AS ENUM ('owned', 'consignment');

CREATE TYPE price_source AS ENUM (
    'contract',
    'brand_rule',
    'price_list',
    'base',
    'manual'
);

CREATE TYPE cash_transaction_kind AS ENUM (
    'vente',
    'achat',
    'versement',
    'paiement',
    'retour_vente',
    'retour_achat'
);

CREATE TYPE counterparty_kind AS ENUM ('customer', 'supplier');

CREATE TYPE supplier_kind AS ENUM ('brand', 'factory');

CREATE TYPE reference_type AS ENUM (
    'order',
    'goods_receipt',
    'purchase_order',
    'return',
    'purchase_return',
    'adjustment'
);
";

const BRANDS_SQL: &str = r"
CREATE TABLE brands (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const FACTORIES_SQL: &str = r"
CREATE TABLE factories (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const WAREHOUSES_SQL: &str = r"
CREATE TABLE warehouses (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY,
    sku VARCHAR(64) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    brand_id UUID REFERENCES brands(id),
    size VARCHAR(32),
    stocking_unit stocking_unit NOT NULL,
    base_price NUMERIC(18, 4) NOT NULL DEFAULT 0,
    cost_price NUMERIC(18, 4) NOT NULL DEFAULT 0,
    pieces_per_box NUMERIC(18, 4) NOT NULL DEFAULT 0,
    boxes_per_pallet NUMERIC(18, 4) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PRICE_LISTS_SQL: &str = r"
CREATE TABLE price_lists (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    customer_kind customer_kind NOT NULL DEFAULT 'retail',
    price_list_id UUID REFERENCES price_lists(id),
    current_balance NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const SUPPLIERS_SQL: &str = r"
CREATE TABLE suppliers (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    current_balance NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PRICE_LIST_ITEMS_SQL: &str = r"
CREATE TABLE price_list_items (
    id UUID PRIMARY KEY,
    price_list_id UUID NOT NULL REFERENCES price_lists(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    price NUMERIC(18, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (price_list_id, product_id)
);
";

const CONTRACT_PRICES_SQL: &str = r"
CREATE TABLE contract_prices (
    id UUID PRIMARY KEY,
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    price NUMERIC(18, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (customer_id, product_id)
);
";

const BRAND_PRICE_RULES_SQL: &str = r"
CREATE TABLE brand_price_rules (
    id UUID PRIMARY KEY,
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    brand_id UUID NOT NULL REFERENCES brands(id) ON DELETE CASCADE,
    size VARCHAR(32) NOT NULL,
    price NUMERIC(18, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (customer_id, brand_id, size)
);
";

const INVENTORY_RECORDS_SQL: &str = r"
CREATE TABLE inventory_records (
    id UUID PRIMARY KEY,
    product_id UUID NOT NULL REFERENCES products(id),
    warehouse_id UUID NOT NULL REFERENCES warehouses(id),
    ownership_type ownership_type NOT NULL DEFAULT 'owned',
    factory_id UUID REFERENCES factories(id),
    quantity_on_hand NUMERIC(18, 4) NOT NULL DEFAULT 0
        CHECK (quantity_on_hand >= 0),
    quantity_reserved NUMERIC(18, 4) NOT NULL DEFAULT 0
        CHECK (quantity_reserved >= 0),
    pallet_count NUMERIC(18, 4) NOT NULL DEFAULT 0,
    colis_count NUMERIC(18, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- One record per stock key; factory_id NULL folds into the constraint
-- via COALESCE so owned stock cannot be duplicated.
CREATE UNIQUE INDEX idx_inventory_records_key
    ON inventory_records (
        product_id,
        warehouse_id,
        ownership_type,
        COALESCE(factory_id, '00000000-0000-0000-0000-000000000000'::uuid)
    );
";

const INVENTORY_TRANSACTIONS_SQL: &str = r"
CREATE TABLE inventory_transactions (
    id UUID PRIMARY KEY,
    product_id UUID NOT NULL REFERENCES products(id),
    warehouse_id UUID NOT NULL REFERENCES warehouses(id),
    movement_type movement_type NOT NULL,
    quantity NUMERIC(18, 4) NOT NULL,
    reference_type reference_type NOT NULL,
    reference_id UUID NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ORDERS_SQL: &str = r"
CREATE TABLE orders (
    id UUID PRIMARY KEY,
    order_number VARCHAR(64) NOT NULL UNIQUE,
    customer_id UUID NOT NULL REFERENCES customers(id),
    warehouse_id UUID NOT NULL REFERENCES warehouses(id),
    status order_status NOT NULL DEFAULT 'pending',
    total_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    payment_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ORDER_ITEMS_SQL: &str = r"
CREATE TABLE order_items (
    id UUID PRIMARY KEY,
    order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity NUMERIC(18, 4) NOT NULL CHECK (quantity > 0),
    sale_unit stocking_unit NOT NULL,
    unit_price NUMERIC(18, 4) NOT NULL,
    price_source price_source NOT NULL,
    discount_pct NUMERIC(5, 2) NOT NULL DEFAULT 0
        CHECK (discount_pct >= 0 AND discount_pct <= 100),
    quantity_stock_unit NUMERIC(18, 4) NOT NULL,
    pallet_count NUMERIC(18, 4) NOT NULL DEFAULT 0,
    colis_count NUMERIC(18, 4) NOT NULL DEFAULT 0,
    cost_price NUMERIC(18, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PURCHASE_ORDERS_SQL: &str = r"
CREATE TABLE purchase_orders (
    id UUID PRIMARY KEY,
    po_number VARCHAR(64) NOT NULL UNIQUE,
    supplier_kind supplier_kind NOT NULL,
    supplier_id UUID NOT NULL,
    warehouse_id UUID NOT NULL REFERENCES warehouses(id),
    ownership_type ownership_type NOT NULL DEFAULT 'owned',
    status purchase_order_status NOT NULL DEFAULT 'pending',
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PURCHASE_ORDER_ITEMS_SQL: &str = r"
CREATE TABLE purchase_order_items (
    id UUID PRIMARY KEY,
    purchase_order_id UUID NOT NULL REFERENCES purchase_orders(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity NUMERIC(18, 4) NOT NULL CHECK (quantity > 0),
    purchase_unit stocking_unit NOT NULL,
    unit_cost NUMERIC(18, 4) NOT NULL DEFAULT 0,
    received_quantity NUMERIC(18, 4) NOT NULL DEFAULT 0
        CHECK (received_quantity >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const GOODS_RECEIPTS_SQL: &str = r"
CREATE TABLE goods_receipts (
    id UUID PRIMARY KEY,
    receipt_number VARCHAR(64) NOT NULL UNIQUE,
    purchase_order_id UUID NOT NULL REFERENCES purchase_orders(id),
    received_by UUID NOT NULL,
    received_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const GOODS_RECEIPT_ITEMS_SQL: &str = r"
CREATE TABLE goods_receipt_items (
    id UUID PRIMARY KEY,
    goods_receipt_id UUID NOT NULL REFERENCES goods_receipts(id) ON DELETE CASCADE,
    purchase_order_item_id UUID NOT NULL REFERENCES purchase_order_items(id),
    quantity NUMERIC(18, 4) NOT NULL CHECK (quantity > 0),
    quantity_stock_unit NUMERIC(18, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const RETURNS_SQL: &str = r"
CREATE TABLE returns (
    id UUID PRIMARY KEY,
    return_number VARCHAR(64) NOT NULL UNIQUE,
    customer_id UUID NOT NULL REFERENCES customers(id),
    warehouse_id UUID NOT NULL REFERENCES warehouses(id),
    order_id UUID REFERENCES orders(id),
    status return_status NOT NULL DEFAULT 'pending',
    total_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const RETURN_ITEMS_SQL: &str = r"
CREATE TABLE return_items (
    id UUID PRIMARY KEY,
    return_id UUID NOT NULL REFERENCES returns(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity NUMERIC(18, 4) NOT NULL CHECK (quantity > 0),
    sale_unit stocking_unit NOT NULL,
    quantity_stock_unit NUMERIC(18, 4) NOT NULL,
    amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PURCHASE_RETURNS_SQL: &str = r"
CREATE TABLE purchase_returns (
    id UUID PRIMARY KEY,
    return_number VARCHAR(64) NOT NULL UNIQUE,
    supplier_id UUID NOT NULL REFERENCES suppliers(id),
    warehouse_id UUID NOT NULL REFERENCES warehouses(id),
    status return_status NOT NULL DEFAULT 'pending',
    total_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PURCHASE_RETURN_ITEMS_SQL: &str = r"
CREATE TABLE purchase_return_items (
    id UUID PRIMARY KEY,
    purchase_return_id UUID NOT NULL REFERENCES purchase_returns(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity NUMERIC(18, 4) NOT NULL CHECK (quantity > 0),
    purchase_unit stocking_unit NOT NULL,
    quantity_stock_unit NUMERIC(18, 4) NOT NULL,
    amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CASH_TRANSACTIONS_SQL: &str = r"
CREATE TABLE cash_transactions (
    id UUID PRIMARY KEY,
    kind cash_transaction_kind NOT NULL,
    amount NUMERIC(18, 2) NOT NULL,
    counterparty_kind counterparty_kind NOT NULL,
    counterparty_id UUID NOT NULL,
    reference_type reference_type NOT NULL,
    reference_id UUID NOT NULL,
    affects_balance BOOLEAN NOT NULL DEFAULT TRUE,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_products_brand ON products(brand_id);
CREATE INDEX idx_inventory_tx_product ON inventory_transactions(product_id, created_at);
CREATE INDEX idx_inventory_tx_reference ON inventory_transactions(reference_type, reference_id);
CREATE INDEX idx_orders_customer ON orders(customer_id);
CREATE INDEX idx_orders_status ON orders(status);
CREATE INDEX idx_order_items_order ON order_items(order_id);
CREATE INDEX idx_po_items_po ON purchase_order_items(purchase_order_id);
CREATE INDEX idx_gr_items_receipt ON goods_receipt_items(goods_receipt_id);
CREATE INDEX idx_return_items_return ON return_items(return_id);
CREATE INDEX idx_pr_items_return ON purchase_return_items(purchase_return_id);
CREATE INDEX idx_cash_tx_counterparty ON cash_transactions(counterparty_kind, counterparty_id);
CREATE INDEX idx_cash_tx_reference ON cash_transactions(reference_type, reference_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS cash_transactions CASCADE;
DROP TABLE IF EXISTS purchase_return_items CASCADE;
DROP TABLE IF EXISTS purchase_returns CASCADE;
DROP TABLE IF EXISTS return_items CASCADE;
DROP TABLE IF EXISTS returns CASCADE;
DROP TABLE IF EXISTS goods_receipt_items CASCADE;
DROP TABLE IF EXISTS goods_receipts CASCADE;
DROP TABLE IF EXISTS purchase_order_items CASCADE;
DROP TABLE IF EXISTS purchase_orders CASCADE;
DROP TABLE IF EXISTS order_items CASCADE;
DROP TABLE IF EXISTS orders CASCADE;
DROP TABLE IF EXISTS inventory_transactions CASCADE;
DROP TABLE IF EXISTS inventory_records CASCADE;
DROP TABLE IF EXISTS brand_price_rules CASCADE;
DROP TABLE IF EXISTS contract_prices CASCADE;
DROP TABLE IF EXISTS price_list_items CASCADE;
DROP TABLE IF EXISTS suppliers CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS price_lists CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS warehouses CASCADE;
DROP TABLE IF EXISTS factories CASCADE;
DROP TABLE IF EXISTS brands CASCADE;

DROP TYPE IF EXISTS reference_type;
DROP TYPE IF EXISTS supplier_kind;
DROP TYPE IF EXISTS counterparty_kind;
DROP TYPE IF EXISTS cash_transaction_kind;
DROP TYPE IF EXISTS price_source;
DROP TYPE IF EXISTS ownership_type;
DROP TYPE IF EXISTS movement_type;
DROP TYPE IF EXISTS return_status;
DROP TYPE IF EXISTS purchase_order_status;
DROP TYPE IF EXISTS order_status;
DROP TYPE IF EXISTS customer_kind;
DROP TYPE IF EXISTS stocking_unit;
";
