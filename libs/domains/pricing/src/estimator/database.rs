use tracing::debug;

use super::{CostEstimator, Quote, non_negative};
use crate::estimate::{CostEstimate, RoundingPolicy};
use crate::models::{DatabaseEngine, DatabaseEnginePricing};

const ESTIMATE_BASE: f64 = 80.0;
const ESTIMATE_PER_GB: f64 = 0.5;

impl CostEstimator {
    /// Monthly price of a managed database.
    ///
    /// `engine_name` is free text ("PostgreSQL 16", "MariaDB", "MS SQL") and is
    /// normalized with [`DatabaseEngine::from_name`].
    pub fn database_cost(
        &self,
        provider_id: &str,
        engine_name: &str,
        size_gb: f64,
        multi_az: bool,
    ) -> CostEstimate {
        let resolved = self.catalog.resolve(provider_id);
        let engine = DatabaseEngine::from_name(engine_name);
        let size_gb = non_negative(size_gb);

        let quote = match self.engine_pricing(&resolved.source_id, engine) {
            Some((priced_as, pricing)) => engine_quote(engine, priced_as, pricing, size_gb, multi_az),
            None => {
                debug!(
                    provider = %resolved.source_id,
                    engine = %engine,
                    "No database pricing, using heuristic"
                );
                Quote::estimated(
                    ESTIMATE_BASE + ESTIMATE_PER_GB * size_gb,
                    format!(
                        "no {} pricing for '{}', {} + {} GB × {}",
                        engine, resolved.source_id, ESTIMATE_BASE, size_gb, ESTIMATE_PER_GB
                    ),
                )
            }
        };

        self.finish(quote, &resolved, RoundingPolicy::WholeUnits)
    }

    /// MySQL is priced like PostgreSQL on providers that only list the latter.
    fn engine_pricing(
        &self,
        source_id: &str,
        engine: DatabaseEngine,
    ) -> Option<(DatabaseEngine, &DatabaseEnginePricing)> {
        self.catalog
            .database_pricing(source_id, engine)
            .map(|pricing| (engine, pricing))
            .or_else(|| match engine {
                DatabaseEngine::Mysql => self
                    .catalog
                    .database_pricing(source_id, DatabaseEngine::Postgresql)
                    .map(|pricing| (DatabaseEngine::Postgresql, pricing)),
                _ => None,
            })
    }
}

fn engine_quote(
    engine: DatabaseEngine,
    priced_as: DatabaseEngine,
    pricing: &DatabaseEnginePricing,
    size_gb: f64,
    multi_az: bool,
) -> Quote {
    let mut amount = pricing.base + size_gb * pricing.storage_per_gb;
    let mut breakdown = format!(
        "{} base {} + {} GB × {}",
        engine, pricing.base, size_gb, pricing.storage_per_gb
    );
    if priced_as != engine {
        breakdown.push_str(&format!(" (priced as {})", priced_as));
    }

    if multi_az {
        match pricing.multi_az {
            Some(factor) => {
                amount *= factor;
                breakdown.push_str(&format!(" × {} multi-AZ", factor));
            }
            None => breakdown.push_str(" (multi-AZ not offered)"),
        }
    }

    Quote::catalog(amount, breakdown, None)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::estimate::PriceSource;

    #[test]
    fn test_database_base_plus_storage() {
        let estimator = fixtures::estimator();
        // 30 + 100 × 0.1
        let estimate = estimator.database_cost("alpha", "PostgreSQL 16", 100.0, false);
        assert_eq!(estimate.price, 40.0);
        assert_eq!(estimate.source, PriceSource::Catalog);
        assert!(estimate.breakdown.starts_with("postgresql"));
    }

    #[test]
    fn test_multi_az_is_multiplicative() {
        let estimator = fixtures::estimator();
        let estimate = estimator.database_cost("alpha", "postgres", 100.0, true);
        assert_eq!(estimate.price, 80.0);
    }

    #[test]
    fn test_multi_az_ignored_without_factor() {
        let estimator = fixtures::estimator();
        // 120 + 50 × 0.2, oracle has no multi_az factor
        let estimate = estimator.database_cost("alpha", "oracle", 50.0, true);
        assert_eq!(estimate.price, 130.0);
        assert!(estimate.breakdown.contains("multi-AZ not offered"));
    }

    #[test]
    fn test_mysql_falls_back_to_postgres_pricing() {
        let estimator = fixtures::estimator();
        let estimate = estimator.database_cost("beta", "MariaDB", 200.0, false);
        // 20 + 200 × 0.05
        assert_eq!(estimate.price, 30.0);
        assert!(estimate.breakdown.contains("priced as postgresql"));
    }

    #[test]
    fn test_missing_engine_is_estimated() {
        let estimator = fixtures::estimator();
        // beta lists no sqlserver and only mysql falls back
        let estimate = estimator.database_cost("beta", "mssql", 100.0, false);
        assert_eq!(estimate.price, 130.0);
        assert!(estimate.is_estimated());
    }

    #[test]
    fn test_missing_provider_linear_estimate() {
        let estimator = fixtures::estimator();
        let estimate = estimator.database_cost("gamma", "postgresql", 300.0, false);
        assert_eq!(estimate.price, 230.0);
        assert!(estimate.is_estimated());
    }

    #[test]
    fn test_database_sovereign_premium() {
        let estimator = fixtures::estimator();
        // (30 + 100 × 0.1) × 2 × 1.2 = 96
        let estimate = estimator.database_cost("alpha-sovereign", "postgresql", 100.0, true);
        assert_eq!(estimate.price, 96.0);
    }

    #[test]
    fn test_unrecognized_engine_defaults_to_postgres() {
        let estimator = fixtures::estimator();
        let estimate = estimator.database_cost("alpha", "CockroachDB", 100.0, false);
        assert_eq!(estimate.price, 40.0);
    }
}
