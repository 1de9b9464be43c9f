use tracing::debug;

use super::{CostEstimator, Quote, non_negative};
use crate::estimate::{CostEstimate, RoundingPolicy};
use crate::models::{HanaPricing, InstanceType, ProviderComputePricing};

/// Heuristic used when a provider has no compute pricing at all
const ESTIMATE_PER_VCPU: f64 = 25.0;
const ESTIMATE_PER_GB_RAM: f64 = 7.0;
const ESTIMATE_MIN: f64 = 35.0;

impl CostEstimator {
    /// Monthly price of a VM with at least `vcpu` cores and `ram_gb` GB RAM.
    ///
    /// General-purpose requests pick the cheapest fitting instance (best-fit).
    /// SAP requests on a provider with a HANA table take the *first* listed
    /// size with enough RAM instead (first-fit), mirroring how HANA sizes are
    /// certified in ascending order.
    pub fn compute_cost(
        &self,
        provider_id: &str,
        vcpu: f64,
        ram_gb: f64,
        sap_required: bool,
    ) -> CostEstimate {
        let resolved = self.catalog.resolve(provider_id);
        let quote = self.compute_quote(
            &resolved.source_id,
            non_negative(vcpu),
            non_negative(ram_gb),
            sap_required,
        );
        self.finish(quote, &resolved, RoundingPolicy::WholeUnits)
    }

    fn compute_quote(&self, source_id: &str, vcpu: f64, ram_gb: f64, sap_required: bool) -> Quote {
        let Some(pricing) = self.catalog.compute.get(source_id) else {
            debug!(provider = source_id, "No compute pricing, using heuristic");
            let amount = (vcpu * ESTIMATE_PER_VCPU + ram_gb * ESTIMATE_PER_GB_RAM).max(ESTIMATE_MIN);
            return Quote::estimated(
                amount,
                format!(
                    "no compute pricing for '{}', {} vCPU × {} + {} GB × {} (min {})",
                    source_id, vcpu, ESTIMATE_PER_VCPU, ram_gb, ESTIMATE_PER_GB_RAM, ESTIMATE_MIN
                ),
            );
        };

        if sap_required {
            if let Some(hana) = self.catalog.hana.get(source_id) {
                return hana_quote(hana, ram_gb);
            }
        }

        // Without a HANA table, SAP requests stay on certified sizes when the provider marks any.
        let sap_only = sap_required && pricing.instances.iter().any(|i| i.sap_certified);
        let candidates = pricing
            .instances
            .iter()
            .filter(|instance| !sap_only || instance.sap_certified);

        match best_fit(candidates, vcpu, ram_gb) {
            Some(instance) => Quote::catalog(
                instance.price,
                describe_instance(instance),
                Some(instance.name.clone()),
            ),
            None => {
                debug!(provider = source_id, vcpu, ram_gb, "No instance fits, using unit rates");
                formula_quote(pricing, vcpu, ram_gb)
            }
        }
    }
}

/// Cheapest instance meeting both minimums. On equal prices the first one in
/// catalog order wins.
pub fn best_fit<'a>(
    instances: impl IntoIterator<Item = &'a InstanceType>,
    vcpu: f64,
    ram_gb: f64,
) -> Option<&'a InstanceType> {
    let mut best: Option<&InstanceType> = None;
    for instance in instances.into_iter().filter(|i| i.fits(vcpu, ram_gb)) {
        match best {
            Some(current) if current.price <= instance.price => {}
            _ => best = Some(instance),
        }
    }
    best
}

/// First instance in catalog order with enough RAM, regardless of price
pub fn first_fit<'a>(
    instances: impl IntoIterator<Item = &'a InstanceType>,
    ram_gb: f64,
) -> Option<&'a InstanceType> {
    instances.into_iter().find(|instance| instance.ram >= ram_gb)
}

fn hana_quote(hana: &HanaPricing, ram_gb: f64) -> Quote {
    match first_fit(&hana.instances, ram_gb) {
        Some(instance) => Quote::catalog(
            instance.price,
            format!("SAP HANA {}", describe_instance(instance)),
            Some(instance.name.clone()),
        ),
        None => Quote::formula(
            ram_gb * hana.price_per_gb_ram,
            format!(
                "SAP HANA {} GB × {} per GB RAM (no certified size large enough)",
                ram_gb, hana.price_per_gb_ram
            ),
        ),
    }
}

fn formula_quote(pricing: &ProviderComputePricing, vcpu: f64, ram_gb: f64) -> Quote {
    let raw = vcpu * pricing.price_per_vcpu + ram_gb * pricing.price_per_gb_ram;
    Quote::formula(
        raw.max(pricing.min_price),
        format!(
            "{} vCPU × {} + {} GB × {} (min {})",
            vcpu, pricing.price_per_vcpu, ram_gb, pricing.price_per_gb_ram, pricing.min_price
        ),
    )
}

fn describe_instance(instance: &InstanceType) -> String {
    format!(
        "{} ({} vCPU, {} GB RAM) at {}",
        instance.name, instance.vcpu, instance.ram, instance.price
    )
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::estimate::PriceSource;
    use crate::models::InstanceType;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_best_fit_picks_cheapest_qualifying_instance() {
        let estimator = fixtures::estimator();
        let estimate = estimator.compute_cost("alpha", 4.0, 16.0, false);

        // b.xlarge and c.xlarge tie at 120.4; the first listed wins
        assert_eq!(estimate.instance_type.as_deref(), Some("b.xlarge"));
        assert_eq!(estimate.price, 120.0);
        assert_eq!(estimate.source, PriceSource::Catalog);
    }

    #[test]
    fn test_smaller_request_still_gets_cheapest_fit() {
        let estimator = fixtures::estimator();
        let estimate = estimator.compute_cost("alpha", 1.0, 2.0, false);
        assert_eq!(estimate.instance_type.as_deref(), Some("a.large"));
        assert_eq!(estimate.price, 70.0);
    }

    #[test]
    fn test_formula_fallback_when_nothing_fits() {
        let estimator = fixtures::estimator();
        let estimate = estimator.compute_cost("alpha", 16.0, 64.0, false);

        // 16 × 20 + 64 × 3 = 512, above min_price
        assert_eq!(estimate.price, 512.0);
        assert_eq!(estimate.instance_type, None);
        assert_eq!(estimate.source, PriceSource::Formula);
    }

    #[test]
    fn test_min_price_floor_only_in_formula_path() {
        let estimator = fixtures::estimator();

        // beta has no instances: 1 × 10 + 1 × 2 = 12 → floored to 25
        let floored = estimator.compute_cost("beta", 1.0, 1.0, false);
        assert_eq!(floored.price, 25.0);
        assert_eq!(floored.source, PriceSource::Formula);
    }

    #[test]
    fn test_unknown_provider_is_estimated() {
        let estimator = fixtures::estimator();

        let small = estimator.compute_cost("nowhere", 0.5, 1.0, false);
        assert_eq!(small.price, 35.0);
        assert!(small.is_estimated());
        assert!(small.breakdown.starts_with("estimated"));

        // 4 × 25 + 16 × 7 = 212
        let large = estimator.compute_cost("nowhere", 4.0, 16.0, false);
        assert_eq!(large.price, 212.0);
    }

    #[test]
    fn test_sovereign_premium_applied_to_unrounded_price() {
        let estimator = fixtures::estimator();
        let base = estimator.compute_cost("alpha", 4.0, 16.0, false);
        let sovereign = estimator.compute_cost("alpha-sovereign", 4.0, 16.0, false);

        // round(120.4 × 1.2) = round(144.48)
        assert_eq!(sovereign.price, 144.0);
        assert_eq!(sovereign.instance_type, base.instance_type);
        assert!(sovereign.price > base.price);
    }

    #[test]
    fn test_hana_is_first_fit_not_best_fit() {
        let estimator = fixtures::estimator();
        let estimate = estimator.compute_cost("alpha", 8.0, 256.0, true);

        // hana.cheap would also fit, but hana.expensive is listed first
        assert_eq!(estimate.instance_type.as_deref(), Some("hana.expensive"));
        assert_eq!(estimate.price, 9000.0);
    }

    #[test]
    fn test_hana_falls_back_to_ram_rate() {
        let estimator = fixtures::estimator();
        let estimate = estimator.compute_cost("alpha", 8.0, 2048.0, true);
        assert_eq!(estimate.price, 20480.0);
        assert_eq!(estimate.instance_type, None);
        assert_eq!(estimate.source, PriceSource::Formula);
    }

    #[test]
    fn test_sap_without_hana_table_prefers_certified_sizes() {
        let mut catalog = fixtures::catalog();
        catalog.hana.clear();
        let estimator = crate::CostEstimator::new(std::sync::Arc::new(catalog));

        let estimate = estimator.compute_cost("alpha", 4.0, 16.0, true);
        assert_eq!(estimate.instance_type.as_deref(), Some("a.xlarge"));
        assert_eq!(estimate.price, 140.0);
    }

    #[test]
    fn test_negative_inputs_price_as_zero() {
        let estimator = fixtures::estimator();
        let estimate = estimator.compute_cost("alpha", -2.0, -8.0, false);
        assert_eq!(estimate.instance_type.as_deref(), Some("a.large"));
    }

    fn instance_strategy() -> impl Strategy<Value = InstanceType> {
        (1u32..64, 1u32..512, 1u32..5000).prop_map(|(vcpu, ram, price)| InstanceType {
            name: format!("i-{}-{}-{}", vcpu, ram, price),
            vcpu: vcpu as f64,
            ram: ram as f64,
            price: price as f64,
            sap_certified: false,
        })
    }

    proptest! {
        #[test]
        fn prop_best_fit_is_cheapest_qualifying(
            instances in prop::collection::vec(instance_strategy(), 0..20),
            vcpu in 0u32..64,
            ram in 0u32..512,
        ) {
            let (vcpu, ram) = (vcpu as f64, ram as f64);
            match best_fit(&instances, vcpu, ram) {
                Some(chosen) => {
                    prop_assert!(chosen.vcpu >= vcpu && chosen.ram >= ram);
                    for other in instances.iter().filter(|i| i.fits(vcpu, ram)) {
                        prop_assert!(other.price >= chosen.price);
                    }
                }
                None => prop_assert!(instances.iter().all(|i| !i.fits(vcpu, ram))),
            }
        }
    }
}
