//! Price resolution waterfall.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::PricingError;
use super::types::{PriceCandidates, PriceSource, ResolvedPrice};

/// Stateless price resolver.
///
/// The db layer pre-fetches the candidate rows; resolution itself is pure
/// so it can be exercised without a database.
pub struct PriceResolver;

impl PriceResolver {
    /// Resolves a price for (product, customer) from pre-fetched
    /// candidates. First matching tier wins; later tiers are never
    /// consulted once an earlier one matches, regardless of their values.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::PriceNotFound`] when every tier, including
    /// the catalog base price, is absent.
    pub fn resolve(
        product_id: Uuid,
        customer_id: Uuid,
        candidates: &PriceCandidates,
    ) -> Result<ResolvedPrice, PricingError> {
        let tiers = [
            (candidates.contract, PriceSource::Contract),
            (candidates.brand_rule, PriceSource::BrandRule),
            (candidates.price_list, PriceSource::PriceList),
            (candidates.base, PriceSource::Base),
        ];

        tiers
            .into_iter()
            .find_map(|(price, source)| price.map(|price| ResolvedPrice { price, source }))
            .ok_or(PricingError::PriceNotFound {
                product_id,
                customer_id,
            })
    }

    /// Validates an operator-supplied explicit price, bypassing the
    /// waterfall.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NegativePrice`] for negative values.
    pub fn explicit(price: Decimal, source: PriceSource) -> Result<ResolvedPrice, PricingError> {
        if price < Decimal::ZERO {
            return Err(PricingError::NegativePrice);
        }
        Ok(ResolvedPrice { price, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids() -> (Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_contract_wins_over_everything() {
        let (product_id, customer_id) = ids();
        let candidates = PriceCandidates {
            contract: Some(dec!(80)),
            brand_rule: Some(dec!(90)),
            price_list: Some(dec!(95)),
            base: Some(dec!(100)),
        };

        let resolved = PriceResolver::resolve(product_id, customer_id, &candidates).unwrap();
        assert_eq!(resolved.price, dec!(80));
        assert_eq!(resolved.source, PriceSource::Contract);
    }

    #[test]
    fn test_brand_rule_beats_list_and_base() {
        let (product_id, customer_id) = ids();
        let candidates = PriceCandidates {
            contract: None,
            brand_rule: Some(dec!(90)),
            price_list: Some(dec!(85)),
            base: Some(dec!(100)),
        };

        let resolved = PriceResolver::resolve(product_id, customer_id, &candidates).unwrap();
        assert_eq!(resolved.source, PriceSource::BrandRule);
        // The cheaper list price does not matter; priority is fixed.
        assert_eq!(resolved.price, dec!(90));
    }

    #[test]
    fn test_price_list_beats_base() {
        let (product_id, customer_id) = ids();
        let candidates = PriceCandidates {
            price_list: Some(dec!(95)),
            base: Some(dec!(100)),
            ..PriceCandidates::default()
        };

        let resolved = PriceResolver::resolve(product_id, customer_id, &candidates).unwrap();
        assert_eq!(resolved.source, PriceSource::PriceList);
    }

    #[test]
    fn test_base_fallback() {
        let (product_id, customer_id) = ids();
        let candidates = PriceCandidates {
            base: Some(dec!(100)),
            ..PriceCandidates::default()
        };

        let resolved = PriceResolver::resolve(product_id, customer_id, &candidates).unwrap();
        assert_eq!(resolved.source, PriceSource::Base);
        assert_eq!(resolved.price, dec!(100));
    }

    #[test]
    fn test_exhausted_waterfall_is_an_error() {
        let (product_id, customer_id) = ids();
        let result = PriceResolver::resolve(product_id, customer_id, &PriceCandidates::default());
        assert_eq!(
            result,
            Err(PricingError::PriceNotFound {
                product_id,
                customer_id,
            })
        );
    }

    #[test]
    fn test_zero_contract_price_is_valid() {
        // A zero contract price is a legitimate giveaway, distinct from
        // "no price found".
        let (product_id, customer_id) = ids();
        let candidates = PriceCandidates {
            contract: Some(dec!(0)),
            base: Some(dec!(100)),
            ..PriceCandidates::default()
        };

        let resolved = PriceResolver::resolve(product_id, customer_id, &candidates).unwrap();
        assert_eq!(resolved.price, dec!(0));
        assert_eq!(resolved.source, PriceSource::Contract);
    }

    #[test]
    fn test_explicit_price() {
        let resolved = PriceResolver::explicit(dec!(42), PriceSource::Base).unwrap();
        assert_eq!(resolved.price, dec!(42));
        assert_eq!(
            PriceResolver::explicit(dec!(-1), PriceSource::Base),
            Err(PricingError::NegativePrice)
        );
    }
}
