use tracing::debug;

use super::{CostEstimator, non_negative};
use crate::estimate::{
    CostEstimate, ESTIMATED_MARKER, KubernetesDetails, KubernetesEstimate, PriceSource, RoundingPolicy,
};

impl CostEstimator {
    /// Monthly price of a managed Kubernetes cluster.
    ///
    /// Worker nodes are priced through [`compute_cost`](Self::compute_cost),
    /// which already carries the sovereign premium; only the control plane fee
    /// is multiplied here. Each term therefore sees the premium exactly once.
    pub fn kubernetes_cost(
        &self,
        provider_id: &str,
        node_count: u32,
        node_vcpu: f64,
        node_ram: f64,
    ) -> KubernetesEstimate {
        let resolved = self.catalog.resolve(provider_id);
        let node = self.compute_cost(provider_id, node_vcpu, node_ram, false);

        let fee = self
            .catalog
            .kubernetes
            .get(&resolved.source_id)
            .map(|pricing| pricing.control_plane_monthly);
        if fee.is_none() {
            debug!(provider = %resolved.source_id, "No Kubernetes pricing, assuming no control plane fee");
        }

        let control_plane = fee.unwrap_or(0.0) * resolved.premium_factor;
        let price = RoundingPolicy::WholeUnits.apply(control_plane + node_count as f64 * node.price);

        let source = match (fee, node.source) {
            (None, _) | (_, PriceSource::Estimated) => PriceSource::Estimated,
            (_, PriceSource::Formula) => PriceSource::Formula,
            _ => PriceSource::Catalog,
        };

        let node_label = node.instance_type.as_deref().unwrap_or("custom");
        let mut breakdown = match fee {
            Some(_) => format!("control plane {:.2}", control_plane),
            None => format!("control plane unknown for '{}'", resolved.source_id),
        };
        breakdown.push_str(&format!(" + {} × {} node at {}", node_count, node_label, node.price));
        if source == PriceSource::Estimated {
            breakdown = format!("{}: {}", ESTIMATED_MARKER, breakdown);
        }

        KubernetesEstimate {
            estimate: CostEstimate {
                price,
                breakdown,
                instance_type: node.instance_type.clone(),
                source,
                currency: self.catalog.currency,
            },
            details: KubernetesDetails {
                control_plane,
                node_count,
                node_price: node.price,
                node_instance_type: node.instance_type,
                node_vcpu: non_negative(node_vcpu),
                node_ram: non_negative(node_ram),
            },
        }
    }
}
