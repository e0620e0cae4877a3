//! Order repository.
//!
//! Wraps the pure order services in database transactions. The order
//! header row is locked with `SELECT ... FOR UPDATE` at the start of
//! every mutation so concurrent edits of one order serialize; stock
//! rows are locked per line through the shared [`stock`] helpers.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use tessera_core::accounting::CashTransactionKind;
use tessera_core::inventory::StockService;
use tessera_core::orders::{
    CustomerKind, ItemSnapshot, LineAmounts, OrderError, OrderService, OrderStatus, ReversalAction,
    ReversalPlan, StockReversal,
};
use tessera_core::pricing::PricingError;
use tessera_core::units::{Unit, UnitService};
use tessera_shared::config::EngineConfig;
use tessera_shared::types::{round_qty, PageRequest, PageResponse};

use crate::catalog::CatalogCache;
use crate::entities::{
    customers, order_items, orders, products,
    sea_orm_active_enums::{self as db_enums, MovementType, ReferenceType},
};

use super::accounting::{self, CashRecordInput};
use super::stock::{
    self, append_movement, levels_of, lock_record, persist_levels, set_lock_timeout, StockKey,
};
use super::{convert, pricing};

/// One line to add to an order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    /// Product being sold.
    pub product_id: Uuid,
    /// Quantity in the sale unit.
    pub quantity: Decimal,
    /// Unit the operator entered the quantity in.
    pub sale_unit: Unit,
    /// Discount percentage, 0 to 100.
    pub discount_pct: Decimal,
    /// Operator price override; `None` runs the waterfall.
    pub explicit_price: Option<Decimal>,
    /// Operator-entered pallet count for the packaging counters.
    pub pallet_count: Decimal,
    /// Operator-entered box count for the packaging counters.
    pub colis_count: Decimal,
}

/// An order header with its lines.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    /// The order header.
    pub order: orders::Model,
    /// The order lines, oldest first.
    pub items: Vec<order_items::Model>,
}

fn db_err(err: DbErr) -> OrderError {
    OrderError::Database(err.to_string())
}

/// Repository over orders and their lines.
#[derive(Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
    catalog: CatalogCache,
    lock_timeout_secs: u64,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, catalog: CatalogCache, engine: &EngineConfig) -> Self {
        Self {
            db,
            catalog,
            lock_timeout_secs: engine.lock_timeout_secs,
        }
    }

    /// Creates an empty pending order. The order number comes from the
    /// caller; number sequencing is not this repository's concern.
    pub async fn create(
        &self,
        order_number: String,
        customer_id: Uuid,
        warehouse_id: Uuid,
        actor: Uuid,
    ) -> Result<orders::Model, OrderError> {
        let now = Utc::now();
        let order = orders::ActiveModel {
            id: Set(Uuid::now_v7()),
            order_number: Set(order_number),
            customer_id: Set(customer_id),
            warehouse_id: Set(warehouse_id),
            status: Set(db_enums::OrderStatus::Pending),
            total_amount: Set(Decimal::ZERO),
            payment_amount: Set(Decimal::ZERO),
            created_by: Set(actor),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let model = order.insert(&self.db).await.map_err(db_err)?;
        info!(order_id = %model.id, order_number = %model.order_number, "order created");
        Ok(model)
    }

    /// Loads an order with its lines.
    pub async fn get(&self, order_id: Uuid) -> Result<OrderWithItems, OrderError> {
        let order = orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(OrderError::NotFound(order_id))?;
        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .order_by_asc(order_items::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(OrderWithItems { order, items })
    }

    /// Lists orders, newest first.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<orders::Model>, OrderError> {
        let paginator = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await.map_err(db_err)?;
        let data = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(db_err)?;
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Adds a line to a pending order: resolves the price, converts the
    /// quantity to the stocking unit, reserves stock and recomputes the
    /// header total, all in one transaction.
    pub async fn add_item(
        &self,
        order_id: Uuid,
        item: NewOrderItem,
    ) -> Result<order_items::Model, OrderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let order = lock_order(&txn, order_id).await?;
        OrderService::validate_edit_items(convert::order_status_to_core(&order.status))?;

        let model = insert_item(&txn, &order, &item).await?;
        recompute_totals(&txn, &order).await?;

        txn.commit().await.map_err(db_err)?;
        self.catalog.spawn_refresh(self.db.clone(), item.product_id);
        Ok(model)
    }

    /// Removes a line from a pending order, releasing its reservation.
    pub async fn remove_item(&self, order_id: Uuid, item_id: Uuid) -> Result<(), OrderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let order = lock_order(&txn, order_id).await?;
        OrderService::validate_edit_items(convert::order_status_to_core(&order.status))?;

        let item = order_items::Entity::find_by_id(item_id)
            .filter(order_items::Column::OrderId.eq(order_id))
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(OrderError::NotFound(item_id))?;

        let key = StockKey::owned(item.product_id, order.warehouse_id);
        let record = lock_record(&txn, &key).await?;
        let levels = StockService::release(levels_of(&record), item.quantity_stock_unit)?;
        persist_levels(&txn, record, levels).await?;

        let product_id = item.product_id;
        order_items::Entity::delete_by_id(item.id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        recompute_totals(&txn, &order).await?;

        txn.commit().await.map_err(db_err)?;
        self.catalog.spawn_refresh(self.db.clone(), product_id);
        Ok(())
    }

    /// Confirms a pending order: commits every reservation out of
    /// on-hand stock, writes the sale (and any payment) to the cash
    /// ledger, and accrues the unpaid remainder on wholesale balances.
    pub async fn confirm(
        &self,
        order_id: Uuid,
        payment_amount: Decimal,
        actor: Uuid,
    ) -> Result<orders::Model, OrderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let order = lock_order(&txn, order_id).await?;
        let items = items_of(&txn, order_id).await?;
        let status = convert::order_status_to_core(&order.status);
        OrderService::validate_confirm(status, items.len(), order.total_amount, payment_amount)?;

        let customer = customers::Entity::find_by_id(order.customer_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(OrderError::NotFound(order.customer_id))?;
        let kind = convert::customer_kind_to_core(&customer.customer_kind);

        // Stock rows are locked in product order so two orders sharing
        // products can never lock them in opposite sequence.
        let mut stock_items: Vec<&order_items::Model> = items.iter().collect();
        stock_items.sort_by_key(|item| item.product_id);
        for item in stock_items {
            let key = StockKey::owned(item.product_id, order.warehouse_id);
            let record = lock_record(&txn, &key).await?;
            let levels = StockService::commit(
                levels_of(&record),
                item.quantity_stock_unit,
                item.pallet_count,
                item.colis_count,
            )?;
            persist_levels(&txn, record, levels).await?;
            append_movement(
                &txn,
                &key,
                MovementType::Out,
                -item.quantity_stock_unit,
                ReferenceType::Order,
                order.id,
                actor,
            )
            .await?;
        }

        // Retail sales settle on the spot; their ledger rows never
        // touch the customer balance.
        let affects_balance = kind == CustomerKind::Wholesale;
        accounting::record_in_txn(
            &txn,
            &CashRecordInput {
                kind: CashTransactionKind::Vente,
                amount: order.total_amount,
                counterparty_id: order.customer_id,
                reference_type: ReferenceType::Order,
                reference_id: order.id,
                affects_balance,
                actor,
            },
        )
        .await?;
        if payment_amount > Decimal::ZERO {
            accounting::record_in_txn(
                &txn,
                &CashRecordInput {
                    kind: CashTransactionKind::Versement,
                    amount: payment_amount,
                    counterparty_id: order.customer_id,
                    reference_type: ReferenceType::Order,
                    reference_id: order.id,
                    affects_balance,
                    actor,
                },
            )
            .await?;
        }

        let order_number = order.order_number.clone();
        let mut active: orders::ActiveModel = order.into();
        active.status = Set(db_enums::OrderStatus::Confirmed);
        active.payment_amount = Set(payment_amount);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        for item in &items {
            self.catalog.spawn_refresh(self.db.clone(), item.product_id);
        }
        info!(order_id = %order_id, order_number = %order_number, payment = %payment_amount,
            "order confirmed");
        Ok(updated)
    }

    /// Replaces the lines of an order, first undoing every side effect
    /// of its current status. Confirmed (or later) orders get their
    /// stock restocked and their cash entries reversed; the order drops
    /// back to pending with a zero payment.
    pub async fn update(
        &self,
        order_id: Uuid,
        new_items: Vec<NewOrderItem>,
        actor: Uuid,
    ) -> Result<OrderWithItems, OrderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let order = lock_order(&txn, order_id).await?;
        let items = items_of(&txn, order_id).await?;
        let status = convert::order_status_to_core(&order.status);

        let snapshots: Vec<ItemSnapshot> = items
            .iter()
            .map(|item| ItemSnapshot {
                product_id: item.product_id,
                quantity_stock_unit: item.quantity_stock_unit,
                pallet_count: item.pallet_count,
                colis_count: item.colis_count,
            })
            .collect();
        let plan = ReversalPlan::for_order(status, &snapshots)?;
        execute_reversal(&txn, &order, &plan, actor).await?;

        order_items::Entity::delete_many()
            .filter(order_items::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let mut touched: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
        let mut new_items = new_items;
        new_items.sort_by_key(|item| item.product_id);
        let mut inserted = Vec::with_capacity(new_items.len());
        for item in &new_items {
            inserted.push(insert_item(&txn, &order, item).await?);
            touched.push(item.product_id);
        }

        let mut active: orders::ActiveModel = order.clone().into();
        active.status = Set(db_enums::OrderStatus::Pending);
        active.payment_amount = Set(Decimal::ZERO);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await.map_err(db_err)?;
        recompute_totals(&txn, &order).await?;

        let result = orders::Entity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(OrderError::NotFound(order_id))?;

        txn.commit().await.map_err(db_err)?;
        for product_id in touched {
            self.catalog.spawn_refresh(self.db.clone(), product_id);
        }
        info!(order_id = %order_id, status = %status, "order edited back to pending");
        Ok(OrderWithItems {
            order: result,
            items: inserted,
        })
    }

    /// Advances an order through the delivery pipeline.
    pub async fn set_delivery_status(
        &self,
        order_id: Uuid,
        to: OrderStatus,
    ) -> Result<orders::Model, OrderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;
        let order = lock_order(&txn, order_id).await?;
        OrderService::validate_transition(convert::order_status_to_core(&order.status), to)?;

        let mut active: orders::ActiveModel = order.into();
        active.status = Set(convert::order_status_from_core(to));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    /// Cancels a pending order, releasing its reservations.
    pub async fn cancel(&self, order_id: Uuid) -> Result<orders::Model, OrderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let order = lock_order(&txn, order_id).await?;
        let status = convert::order_status_to_core(&order.status);
        OrderService::validate_cancel(status)?;

        let items = items_of(&txn, order_id).await?;
        release_reservations(&txn, &order, &items).await?;

        let mut active: orders::ActiveModel = order.into();
        active.status = Set(db_enums::OrderStatus::Cancelled);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        for item in &items {
            self.catalog.spawn_refresh(self.db.clone(), item.product_id);
        }
        info!(order_id = %order_id, "order cancelled");
        Ok(updated)
    }

    /// Deletes a pending order and its lines outright.
    pub async fn delete(&self, order_id: Uuid) -> Result<(), OrderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        set_lock_timeout(&txn, self.lock_timeout_secs).await?;

        let order = lock_order(&txn, order_id).await?;
        OrderService::validate_delete(convert::order_status_to_core(&order.status))?;

        let items = items_of(&txn, order_id).await?;
        release_reservations(&txn, &order, &items).await?;

        order_items::Entity::delete_many()
            .filter(order_items::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        orders::Entity::delete_by_id(order_id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        for item in &items {
            self.catalog.spawn_refresh(self.db.clone(), item.product_id);
        }
        Ok(())
    }
}

/// Locks the order header row for the duration of the transaction.
async fn lock_order(
    txn: &DatabaseTransaction,
    order_id: Uuid,
) -> Result<orders::Model, OrderError> {
    orders::Entity::find_by_id(order_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(OrderError::NotFound(order_id))
}

async fn items_of(
    txn: &DatabaseTransaction,
    order_id: Uuid,
) -> Result<Vec<order_items::Model>, OrderError> {
    order_items::Entity::find()
        .filter(order_items::Column::OrderId.eq(order_id))
        .order_by_asc(order_items::Column::CreatedAt)
        .all(txn)
        .await
        .map_err(db_err)
}

/// Resolves price and conversion for a new line, reserves stock, and
/// inserts the row with frozen snapshots.
async fn insert_item(
    txn: &DatabaseTransaction,
    order: &orders::Model,
    item: &NewOrderItem,
) -> Result<order_items::Model, OrderError> {
    let product = products::Entity::find_by_id(item.product_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(OrderError::NotFound(item.product_id))?;
    let customer = customers::Entity::find_by_id(order.customer_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(OrderError::NotFound(order.customer_id))?;

    let packaging = convert::packaging_of(&product);
    let derived = stock::derived_pieces_per_box(txn, item.product_id, &packaging).await?;
    let quantity_stock =
        UnitService::to_stocking_unit(&packaging, item.quantity, item.sale_unit, derived)?;

    // An explicit operator price is frozen with `manual` provenance;
    // otherwise the waterfall decides.
    let (unit_price, price_source) = match item.explicit_price {
        Some(price) => {
            if price < Decimal::ZERO {
                return Err(PricingError::NegativePrice.into());
            }
            (price, db_enums::PriceSource::Manual)
        }
        None => {
            let resolved = pricing::resolve_in_conn(txn, &product, &customer).await?;
            (
                resolved.price,
                convert::price_source_from_core(resolved.source),
            )
        }
    };

    let key = StockKey::owned(item.product_id, order.warehouse_id);
    let record = lock_record(txn, &key).await?;
    let levels = StockService::reserve(levels_of(&record), quantity_stock)?;
    persist_levels(txn, record, levels).await?;

    let now = Utc::now();
    let row = order_items::ActiveModel {
        id: Set(Uuid::now_v7()),
        order_id: Set(order.id),
        product_id: Set(item.product_id),
        quantity: Set(item.quantity),
        sale_unit: Set(convert::unit_from_core(item.sale_unit)),
        unit_price: Set(unit_price),
        price_source: Set(price_source),
        discount_pct: Set(item.discount_pct),
        quantity_stock_unit: Set(quantity_stock),
        pallet_count: Set(item.pallet_count),
        colis_count: Set(item.colis_count),
        cost_price: Set(product.cost_price),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    row.insert(txn).await.map_err(db_err)
}

/// Recomputes the header total from the current lines.
async fn recompute_totals(
    txn: &DatabaseTransaction,
    order: &orders::Model,
) -> Result<(), OrderError> {
    let items = items_of(txn, order.id).await?;
    let lines: Vec<LineAmounts> = items
        .iter()
        .map(|item| LineAmounts {
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount_pct: item.discount_pct,
        })
        .collect();
    let totals = OrderService::compute_totals(&lines);

    let mut active = orders::ActiveModel {
        id: Set(order.id),
        ..Default::default()
    };
    active.total_amount = Set(totals.total_amount);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await.map_err(db_err)?;
    Ok(())
}

/// Executes a reversal plan inside the caller's transaction.
async fn execute_reversal(
    txn: &DatabaseTransaction,
    order: &orders::Model,
    plan: &ReversalPlan,
    actor: Uuid,
) -> Result<(), OrderError> {
    let mut stock: Vec<&StockReversal> = plan.stock.iter().collect();
    stock.sort_by_key(|reversal| reversal.product_id);
    for reversal in stock {
        let key = StockKey::owned(reversal.product_id, order.warehouse_id);
        let record = lock_record(txn, &key).await?;
        match reversal.action {
            ReversalAction::Release { quantity } => {
                let levels = StockService::release(levels_of(&record), quantity)?;
                persist_levels(txn, record, levels).await?;
            }
            ReversalAction::Restock {
                quantity,
                pallet_count,
                colis_count,
            } => {
                let mut levels = StockService::restock(levels_of(&record), quantity)?;
                levels.pallet_count = round_qty(levels.pallet_count + pallet_count);
                levels.colis_count = round_qty(levels.colis_count + colis_count);
                persist_levels(txn, record, levels).await?;
                append_movement(
                    txn,
                    &key,
                    MovementType::In,
                    quantity,
                    ReferenceType::Order,
                    order.id,
                    actor,
                )
                .await?;
            }
        }
    }
    if plan.reverse_cash {
        accounting::reverse_for_reference(txn, ReferenceType::Order, order.id).await?;
    }
    Ok(())
}

/// Releases the reservations held by a pending order's lines.
async fn release_reservations(
    txn: &DatabaseTransaction,
    order: &orders::Model,
    items: &[order_items::Model],
) -> Result<(), OrderError> {
    let mut items: Vec<&order_items::Model> = items.iter().collect();
    items.sort_by_key(|item| item.product_id);
    for item in items {
        let key = StockKey::owned(item.product_id, order.warehouse_id);
        let record = lock_record(txn, &key).await?;
        let levels = StockService::release(levels_of(&record), item.quantity_stock_unit)?;
        persist_levels(txn, record, levels).await?;
    }
    Ok(())
}
