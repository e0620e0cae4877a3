//! Pricing domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved price came from.
///
/// Persisted on the order item so historical lines keep their provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Explicit (customer, product) override.
    Contract,
    /// Explicit (customer, brand, size) override.
    BrandRule,
    /// The customer's assigned price list.
    PriceList,
    /// The product's catalog base price.
    Base,
}

impl PriceSource {
    /// Returns the string representation of the source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::BrandRule => "brand_rule",
            Self::PriceList => "price_list",
            Self::Base => "base",
        }
    }

    /// Parses a source from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "contract" => Some(Self::Contract),
            "brand_rule" => Some(Self::BrandRule),
            "price_list" => Some(Self::PriceList),
            "base" => Some(Self::Base),
            _ => None,
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The candidate prices for one (product, customer) pair, pre-fetched by
/// the caller in waterfall order.
///
/// A `None` tier simply means no row exists for that tier. The brand-rule
/// tier must only be populated when the product has both a brand and a
/// non-null size.
#[derive(Debug, Clone, Default)]
pub struct PriceCandidates {
    /// (customer, product) contract price.
    pub contract: Option<Decimal>,
    /// (customer, brand, size) rule price.
    pub brand_rule: Option<Decimal>,
    /// Price from the customer's assigned price list.
    pub price_list: Option<Decimal>,
    /// Catalog base price.
    pub base: Option<Decimal>,
}

/// A resolved price with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    /// The unit price.
    pub price: Decimal,
    /// Which waterfall tier produced it.
    pub source: PriceSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_roundtrip() {
        for source in [
            PriceSource::Contract,
            PriceSource::BrandRule,
            PriceSource::PriceList,
            PriceSource::Base,
        ] {
            assert_eq!(PriceSource::parse(source.as_str()), Some(source));
        }
    }

    #[test]
    fn test_source_parse_rejects_unknown() {
        assert_eq!(PriceSource::parse("not_found"), None);
    }
}
