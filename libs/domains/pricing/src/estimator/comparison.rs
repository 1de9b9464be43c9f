use tracing::debug;

use super::CostEstimator;
use crate::estimate::{
    CostEstimate, ProviderQuote, RoundingPolicy, ServiceRequest, WorkloadConfig, WorkloadEstimate,
};
use crate::models::StorageClass;

impl CostEstimator {
    /// Price the standard workload on one provider.
    ///
    /// Every line item comes out of its calculator with the sovereign premium
    /// already applied; the total is their plain sum.
    pub fn standard_workload(&self, provider_id: &str, config: &WorkloadConfig) -> WorkloadEstimate {
        let compute = self.compute_cost(provider_id, config.vcpu, config.ram_gb, config.sap_required);
        let database = self.database_cost(
            provider_id,
            &config.database_engine,
            config.database_size_gb,
            config.database_multi_az,
        );
        let object_storage = self.storage_cost(
            provider_id,
            StorageClass::Object,
            config.object_storage_gb,
            &config.object_storage_tier,
        );
        let block_storage = self.storage_cost(
            provider_id,
            StorageClass::Block,
            config.block_storage_gb,
            &config.block_storage_tier,
        );
        let observability = self.observability_cost(
            provider_id,
            config.metrics,
            config.alarms,
            config.logs_gb,
            config.retention_gb,
        );

        let total = RoundingPolicy::Cents.apply(
            compute.price
                + database.price
                + object_storage.price
                + block_storage.price
                + observability.price,
        );

        WorkloadEstimate {
            provider_id: provider_id.trim().to_lowercase(),
            total,
            currency: self.catalog.currency,
            compute,
            database,
            object_storage,
            block_storage,
            observability,
        }
    }

    /// Price a single-service request on one provider
    pub fn quote(&self, provider_id: &str, request: &ServiceRequest) -> CostEstimate {
        match request {
            ServiceRequest::Compute {
                vcpu,
                ram_gb,
                sap_required,
            } => self.compute_cost(provider_id, *vcpu, *ram_gb, *sap_required),
            ServiceRequest::Database {
                engine,
                size_gb,
                multi_az,
            } => self.database_cost(provider_id, engine, *size_gb, *multi_az),
            ServiceRequest::Storage {
                class,
                size_gb,
                tier,
            } => self.storage_cost(provider_id, *class, *size_gb, tier),
            ServiceRequest::Kubernetes {
                node_count,
                node_vcpu,
                node_ram,
            } => {
                self.kubernetes_cost(provider_id, *node_count, *node_vcpu, *node_ram)
                    .estimate
            }
            ServiceRequest::Observability {
                metrics,
                alarms,
                logs_gb,
                retention_gb,
            } => self.observability_cost(provider_id, *metrics, *alarms, *logs_gb, *retention_gb),
        }
    }

    /// Price a request on every catalog provider (base providers first, then
    /// sovereign ones), cheapest first.
    pub fn compare_provider_prices(&self, request: &ServiceRequest) -> Vec<ProviderQuote> {
        let provider_ids = self.catalog.provider_ids();
        self.compare_providers(request, provider_ids.as_slice())
    }

    /// Price a request on the given providers, cheapest first. Equal prices
    /// keep the order of `provider_ids`.
    pub fn compare_providers<S: AsRef<str>>(
        &self,
        request: &ServiceRequest,
        provider_ids: &[S],
    ) -> Vec<ProviderQuote> {
        let mut quotes: Vec<ProviderQuote> = provider_ids
            .iter()
            .map(|id| ProviderQuote {
                provider_id: id.as_ref().trim().to_lowercase(),
                provider_name: self.catalog.provider_name(id.as_ref()),
                estimate: self.quote(id.as_ref(), request),
            })
            .collect();

        quotes.sort_by(|a, b| a.estimate.price.total_cmp(&b.estimate.price));
        debug!(providers = quotes.len(), "Compared provider prices");
        quotes
    }

    /// Standard workload on every catalog provider, cheapest first
    pub fn compare_standard_workload(&self, config: &WorkloadConfig) -> Vec<WorkloadEstimate> {
        let mut estimates: Vec<WorkloadEstimate> = self
            .catalog
            .provider_ids()
            .iter()
            .map(|id| self.standard_workload(id, config))
            .collect();

        estimates.sort_by(|a, b| a.total.total_cmp(&b.total));
        debug!(providers = estimates.len(), "Compared standard workloads");
        estimates
    }
}
