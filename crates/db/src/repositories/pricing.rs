//! Pricing repository — fetches the waterfall candidates and runs the
//! pure resolver over them.

use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use tessera_core::pricing::{PriceCandidates, PriceResolver, PricingError, ResolvedPrice};

use crate::entities::{brand_price_rules, contract_prices, customers, price_list_items, products};

fn db_err(err: DbErr) -> PricingError {
    PricingError::Database(err.to_string())
}

/// Fetches the candidate prices for one (product, customer) pair.
///
/// The brand-rule tier is only consulted when the product carries both
/// a brand and a size; a product without either can never match a rule
/// row, so the query is skipped entirely.
pub(crate) async fn fetch_candidates<C: ConnectionTrait>(
    conn: &C,
    product: &products::Model,
    customer: &customers::Model,
) -> Result<PriceCandidates, PricingError> {
    let contract = contract_prices::Entity::find()
        .filter(contract_prices::Column::CustomerId.eq(customer.id))
        .filter(contract_prices::Column::ProductId.eq(product.id))
        .one(conn)
        .await
        .map_err(db_err)?
        .map(|row| row.price);

    let brand_rule = match (product.brand_id, product.size.as_deref()) {
        (Some(brand_id), Some(size)) => brand_price_rules::Entity::find()
            .filter(brand_price_rules::Column::CustomerId.eq(customer.id))
            .filter(brand_price_rules::Column::BrandId.eq(brand_id))
            .filter(brand_price_rules::Column::Size.eq(size))
            .one(conn)
            .await
            .map_err(db_err)?
            .map(|row| row.price),
        _ => None,
    };

    let price_list = match customer.price_list_id {
        Some(price_list_id) => price_list_items::Entity::find()
            .filter(price_list_items::Column::PriceListId.eq(price_list_id))
            .filter(price_list_items::Column::ProductId.eq(product.id))
            .one(conn)
            .await
            .map_err(db_err)?
            .map(|row| row.price),
        None => None,
    };

    Ok(PriceCandidates {
        contract,
        brand_rule,
        price_list,
        base: Some(product.base_price),
    })
}

/// Resolves a price inside the caller's transaction, loading the rows
/// it needs.
pub(crate) async fn resolve_in_conn<C: ConnectionTrait>(
    conn: &C,
    product: &products::Model,
    customer: &customers::Model,
) -> Result<ResolvedPrice, PricingError> {
    let candidates = fetch_candidates(conn, product, customer).await?;
    PriceResolver::resolve(product.id, customer.id, &candidates)
}

/// Pricing repository for standalone price lookups (quotes, the "what
/// would this customer pay" endpoint).
#[derive(Clone)]
pub struct PricingRepository {
    db: DatabaseConnection,
}

impl PricingRepository {
    /// Creates a new pricing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves the effective price for (product, customer).
    pub async fn resolve_for(
        &self,
        product_id: Uuid,
        customer_id: Uuid,
    ) -> Result<ResolvedPrice, PricingError> {
        let product = products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(PricingError::PriceNotFound {
                product_id,
                customer_id,
            })?;
        let customer = customers::Entity::find_by_id(customer_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(PricingError::PriceNotFound {
                product_id,
                customer_id,
            })?;

        resolve_in_conn(&self.db, &product, &customer).await
    }
}
