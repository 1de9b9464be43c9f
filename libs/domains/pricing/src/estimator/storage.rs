use std::collections::BTreeMap;
use tracing::debug;

use super::{CostEstimator, Quote, non_negative};
use crate::estimate::{CostEstimate, RoundingPolicy};
use crate::models::StorageClass;

/// Per-GB price used when the provider lists no tiers for the class
const ESTIMATE_PER_GB: f64 = 0.05;
const STANDARD_TIER: &str = "standard";

impl CostEstimator {
    /// Monthly price of `size_gb` of storage, rounded to cents.
    ///
    /// The tier is looked up, in order, as: the provider-native key for a
    /// canonical tier (`ssd`, `hdd`, `nvme`), the tier string as given,
    /// `standard`, and finally the provider's first listed tier.
    pub fn storage_cost(
        &self,
        provider_id: &str,
        class: StorageClass,
        size_gb: f64,
        tier: &str,
    ) -> CostEstimate {
        let resolved = self.catalog.resolve(provider_id);
        let size_gb = non_negative(size_gb);

        let tiers = self
            .catalog
            .storage
            .get(&resolved.source_id)
            .map(|pricing| pricing.tiers(class))
            .filter(|tiers| !tiers.is_empty());

        let quote = match tiers {
            Some(tiers) => self.tier_quote(&resolved.source_id, tiers, class, size_gb, tier),
            None => {
                debug!(provider = %resolved.source_id, class = %class, "No storage pricing, using heuristic");
                Quote::estimated(
                    size_gb * ESTIMATE_PER_GB,
                    format!(
                        "no {} storage pricing for '{}', {} GB × {}",
                        class, resolved.source_id, size_gb, ESTIMATE_PER_GB
                    ),
                )
            }
        };

        self.finish(quote, &resolved, RoundingPolicy::Cents)
    }

    fn tier_quote(
        &self,
        source_id: &str,
        tiers: &BTreeMap<String, f64>,
        class: StorageClass,
        size_gb: f64,
        tier: &str,
    ) -> Quote {
        let candidates = [self.tiers.resolve(tier, source_id), Some(tier.trim()), Some(STANDARD_TIER)];
        let matched = candidates
            .into_iter()
            .flatten()
            .find_map(|key| lookup_tier(tiers, key));

        let (key, unit_price, note) = match matched {
            Some((key, price)) => (key, price, String::new()),
            None => {
                // Non-empty, checked by the caller
                let (key, price) = tiers
                    .iter()
                    .next()
                    .map(|(key, price)| (key.as_str(), *price))
                    .unwrap_or((STANDARD_TIER, ESTIMATE_PER_GB));
                debug!(provider = source_id, requested = tier, using = key, "Storage tier not offered");
                (key, price, format!(" (tier '{}' not offered)", tier))
            }
        };

        Quote::catalog(
            size_gb * unit_price,
            format!("{} GB {} {} × {}{}", size_gb, class, key, unit_price, note),
            None,
        )
    }
}

/// Exact key first, then a case-insensitive match
fn lookup_tier<'a>(tiers: &'a BTreeMap<String, f64>, key: &str) -> Option<(&'a str, f64)> {
    tiers
        .get_key_value(key)
        .or_else(|| tiers.iter().find(|(name, _)| name.eq_ignore_ascii_case(key)))
        .map(|(name, price)| (name.as_str(), *price))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::estimate::PriceSource;
    use crate::models::StorageClass;

    #[test]
    fn test_canonical_tier_maps_to_native_key() {
        let estimator = fixtures::estimator();
        let estimate = estimator.storage_cost("alpha", StorageClass::Block, 100.0, "ssd");
        // 100 × 0.08 via gp3
        assert_eq!(estimate.price, 8.0);
        assert!(estimate.breakdown.contains("gp3"));
        assert_eq!(estimate.source, PriceSource::Catalog);
    }

    #[test]
    fn test_canonical_equals_native_request() {
        let estimator = fixtures::estimator();
        for (canonical, native) in [("ssd", "gp3"), ("hdd", "st1"), ("nvme", "io2")] {
            let via_canonical = estimator.storage_cost("alpha", StorageClass::Block, 250.0, canonical);
            let via_native = estimator.storage_cost("alpha", StorageClass::Block, 250.0, native);
            assert_eq!(via_canonical.price, via_native.price, "tier {}", canonical);
        }
    }

    #[test]
    fn test_raw_tier_is_case_insensitive() {
        let estimator = fixtures::estimator();
        let estimate = estimator.storage_cost("alpha", StorageClass::Object, 1000.0, "ARCHIVE");
        assert_eq!(estimate.price, 4.0);
    }

    #[test]
    fn test_unknown_tier_falls_back_to_standard() {
        let estimator = fixtures::estimator();
        let estimate = estimator.storage_cost("alpha", StorageClass::Object, 500.0, "glacier-deep");
        // 500 × 0.02
        assert_eq!(estimate.price, 10.0);
    }

    #[test]
    fn test_unknown_tier_without_standard_uses_first_listed() {
        let estimator = fixtures::estimator();
        // beta block tiers: fast 0.07, slow 0.03; "fast" sorts first
        let estimate = estimator.storage_cost("beta", StorageClass::Block, 100.0, "ssd");
        assert_eq!(estimate.price, 7.0);
        assert!(estimate.breakdown.contains("not offered"));
    }

    #[test]
    fn test_missing_class_is_estimated() {
        let estimator = fixtures::estimator();
        let estimate = estimator.storage_cost("beta", StorageClass::File, 100.0, "standard");
        assert_eq!(estimate.price, 5.0);
        assert!(estimate.is_estimated());
    }

    #[test]
    fn test_two_decimal_rounding() {
        let estimator = fixtures::estimator();
        // 333 × 0.045 = 14.985 → cents
        let estimate = estimator.storage_cost("alpha", StorageClass::Block, 333.0, "hdd");
        assert_eq!(estimate.price, (333.0_f64 * 0.045 * 100.0).round() / 100.0);
        assert_ne!(estimate.price, estimate.price.round());
    }

    #[test]
    fn test_storage_sovereign_premium() {
        let estimator = fixtures::estimator();
        // 100 × 0.08 × 1.2
        let estimate = estimator.storage_cost("alpha-sovereign", StorageClass::Block, 100.0, "ssd");
        assert_eq!(estimate.price, 9.6);
    }
}
