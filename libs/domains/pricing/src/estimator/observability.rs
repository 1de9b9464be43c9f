use tracing::debug;

use super::{CostEstimator, Quote, non_negative};
use crate::estimate::{CostEstimate, RoundingPolicy};
use crate::models::{ObservabilityPricing, ProviderCategory};

/// Flat monthly estimate for providers without monitoring pricing
pub fn bucket_estimate(category: ProviderCategory) -> f64 {
    match category {
        // Prometheus/Grafana run on own infrastructure
        ProviderCategory::SelfHosted => 40.0,
        ProviderCategory::EuRegional => 25.0,
        ProviderCategory::Hyperscaler => 60.0,
    }
}

impl CostEstimator {
    /// Monthly price of monitoring and logging
    pub fn observability_cost(
        &self,
        provider_id: &str,
        metrics: f64,
        alarms: f64,
        logs_gb: f64,
        retention_gb: f64,
    ) -> CostEstimate {
        let resolved = self.catalog.resolve(provider_id);

        let quote = match self.catalog.observability.get(&resolved.source_id) {
            Some(pricing) => usage_quote(
                pricing,
                non_negative(metrics),
                non_negative(alarms),
                non_negative(logs_gb),
                non_negative(retention_gb),
            ),
            None => {
                let category = self.catalog.provider_category(&resolved.source_id);
                debug!(
                    provider = %resolved.source_id,
                    category = %category,
                    "No observability pricing, using category estimate"
                );
                Quote::estimated(
                    bucket_estimate(category),
                    format!("no monitoring pricing for '{}', flat {} rate", resolved.source_id, category),
                )
            }
        };

        self.finish(quote, &resolved, RoundingPolicy::WholeUnits)
    }
}

fn usage_quote(
    pricing: &ObservabilityPricing,
    metrics: f64,
    alarms: f64,
    logs_gb: f64,
    retention_gb: f64,
) -> Quote {
    let base = pricing.base_monthly.unwrap_or(0.0);
    let amount = base
        + metrics * pricing.metrics_per_month
        + alarms * pricing.alarms_per_month
        + logs_gb * pricing.ingestion_per_gb
        + retention_gb * pricing.storage_per_gb;

    let mut parts = Vec::new();
    if let Some(base) = pricing.base_monthly {
        parts.push(format!("base {}", base));
    }
    parts.push(format!("{} metrics × {}", metrics, pricing.metrics_per_month));
    parts.push(format!("{} alarms × {}", alarms, pricing.alarms_per_month));
    parts.push(format!("{} GB logs × {}", logs_gb, pricing.ingestion_per_gb));
    parts.push(format!("{} GB retained × {}", retention_gb, pricing.storage_per_gb));

    Quote::catalog(amount, parts.join(" + "), None)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::estimate::PriceSource;

    #[test]
    fn test_usage_based_pricing() {
        let estimator = fixtures::estimator();
        // 100 × 0.3 + 50 × 0.1 + 100 × 0.5 + 100 × 0.03 = 88
        let estimate = estimator.observability_cost("alpha", 100.0, 50.0, 100.0, 100.0);
        assert_eq!(estimate.price, 88.0);
        assert_eq!(estimate.source, PriceSource::Catalog);
    }

    #[test]
    fn test_flat_base_monthly() {
        let estimator = fixtures::estimator();
        // 15 + 10 × 0.4
        let estimate = estimator.observability_cost("beta", 10.0, 5.0, 10.0, 10.0);
        assert_eq!(estimate.price, 19.0);
        assert!(estimate.breakdown.starts_with("base 15"));
    }

    #[test]
    fn test_category_buckets() {
        let estimator = fixtures::estimator();

        let self_hosted = estimator.observability_cost("gamma", 10.0, 5.0, 10.0, 10.0);
        assert_eq!(self_hosted.price, 40.0);
        assert!(self_hosted.is_estimated());

        // unknown id, inferred as EU regional from its name
        let eu = estimator.observability_cost("scaleway", 10.0, 5.0, 10.0, 10.0);
        assert_eq!(eu.price, 25.0);

        let hyperscaler = estimator.observability_cost("bigcloud", 10.0, 5.0, 10.0, 10.0);
        assert_eq!(hyperscaler.price, 60.0);
    }

    #[test]
    fn test_observability_sovereign_premium() {
        let estimator = fixtures::estimator();
        // 88 × 1.2 = 105.6
        let estimate = estimator.observability_cost("alpha-sovereign", 100.0, 50.0, 100.0, 100.0);
        assert_eq!(estimate.price, 106.0);
    }
}
