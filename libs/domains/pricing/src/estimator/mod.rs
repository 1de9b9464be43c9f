//! Cost Estimator
//!
//! One calculator per service category, all pure functions of
//! `(provider id, request, catalog)`.
//!
//! Sovereign providers are resolved to their base provider for every lookup.
//! The premium is applied exactly once per line item, in [`CostEstimator::finish`],
//! before rounding. Aggregates ([`CostEstimator::standard_workload`]) sum
//! finished line items and never apply it again.

mod comparison;
mod compute;
mod database;
mod kubernetes;
mod observability;
mod storage;

pub use compute::{best_fit, first_fit};
pub use observability::bucket_estimate;

use std::sync::Arc;

use crate::catalog::{PricingCatalog, ResolvedProvider};
use crate::estimate::{CostEstimate, ESTIMATED_MARKER, PriceSource, RoundingPolicy};
use crate::tier_normalizer::TierNormalizer;

/// Stateless price calculator over an immutable catalog
#[derive(Debug, Clone)]
pub struct CostEstimator {
    catalog: Arc<PricingCatalog>,
    tiers: Arc<TierNormalizer>,
}

impl CostEstimator {
    /// Build an estimator; the tier table is the built-in one with the
    /// catalog's `tier_aliases` merged on top.
    pub fn new(catalog: Arc<PricingCatalog>) -> Self {
        let tiers = TierNormalizer::default().with_overrides(&catalog.tier_aliases);
        Self {
            catalog,
            tiers: Arc::new(tiers),
        }
    }

    /// Replace the tier table
    pub fn with_tier_normalizer(mut self, tiers: TierNormalizer) -> Self {
        self.tiers = Arc::new(tiers);
        self
    }

    pub fn catalog(&self) -> &PricingCatalog {
        &self.catalog
    }

    pub fn tier_normalizer(&self) -> &TierNormalizer {
        &self.tiers
    }

    /// Apply the sovereign premium to a base-provider quote, then round
    fn finish(&self, quote: Quote, resolved: &ResolvedProvider, policy: RoundingPolicy) -> CostEstimate {
        let mut breakdown = quote.breakdown;
        if resolved.is_sovereign() {
            breakdown.push_str(&format!(
                " × {} sovereign premium ({} via {})",
                resolved.premium_factor, resolved.requested, resolved.source_id
            ));
        }

        CostEstimate {
            price: policy.apply(quote.amount * resolved.premium_factor),
            breakdown,
            instance_type: quote.instance_type,
            source: quote.source,
            currency: self.catalog.currency,
        }
    }
}

/// Unrounded base-provider price, before premium
#[derive(Debug, Clone, PartialEq)]
struct Quote {
    amount: f64,
    breakdown: String,
    instance_type: Option<String>,
    source: PriceSource,
}

impl Quote {
    fn catalog(amount: f64, breakdown: String, instance_type: Option<String>) -> Self {
        Self {
            amount,
            breakdown,
            instance_type,
            source: PriceSource::Catalog,
        }
    }

    fn formula(amount: f64, breakdown: String) -> Self {
        Self {
            amount,
            breakdown,
            instance_type: None,
            source: PriceSource::Formula,
        }
    }

    fn estimated(amount: f64, reason: String) -> Self {
        Self {
            amount,
            breakdown: format!("{}: {}", ESTIMATED_MARKER, reason),
            instance_type: None,
            source: PriceSource::Estimated,
        }
    }
}

/// Requests are domain-checked here rather than rejected: negative and NaN
/// quantities price as zero.
fn non_negative(value: f64) -> f64 {
    value.max(0.0)
}
