//! Calculator inputs and outputs

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::models::{Currency, StorageClass};

/// Where a price came from. Callers use this to tell catalog-backed numbers
/// from heuristics, which carry much lower confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, Hash)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PriceSource {
    /// A concrete catalog entry (instance, engine, tier)
    Catalog,
    /// Catalog per-unit rates applied to the requested shape
    Formula,
    /// Heuristic used because the catalog has no data for the provider
    Estimated,
}

/// Rounding granularity of a calculator.
///
/// Compute, database, kubernetes and observability round to whole currency
/// units. Storage rounds to cents because per-GB prices are small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    WholeUnits,
    Cents,
}

impl RoundingPolicy {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingPolicy::WholeUnits => value.round(),
            RoundingPolicy::Cents => (value * 100.0).round() / 100.0,
        }
    }
}

/// Marker every heuristic breakdown starts with
pub const ESTIMATED_MARKER: &str = "estimated";

/// Monthly price for one service line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub price: f64,
    /// Human-readable explanation of the number
    pub breakdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    pub source: PriceSource,
    pub currency: Currency,
}

impl CostEstimate {
    pub fn is_estimated(&self) -> bool {
        self.source == PriceSource::Estimated
    }
}

/// Extra detail of a Kubernetes estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KubernetesDetails {
    /// Control plane fee after premium
    pub control_plane: f64,
    pub node_count: u32,
    /// Price of one worker node after premium
    pub node_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_instance_type: Option<String>,
    pub node_vcpu: f64,
    pub node_ram: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KubernetesEstimate {
    #[serde(flatten)]
    pub estimate: CostEstimate,
    pub details: KubernetesDetails,
}

/// Resource profile of the standard workload. Every field has a default so a
/// caller can override only what differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    pub vcpu: f64,
    pub ram_gb: f64,
    pub sap_required: bool,
    pub database_engine: String,
    pub database_size_gb: f64,
    pub database_multi_az: bool,
    pub object_storage_gb: f64,
    pub object_storage_tier: String,
    pub block_storage_gb: f64,
    pub block_storage_tier: String,
    pub metrics: f64,
    pub alarms: f64,
    pub logs_gb: f64,
    pub retention_gb: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            vcpu: 2.0,
            ram_gb: 8.0,
            sap_required: false,
            database_engine: "postgresql".to_string(),
            database_size_gb: 100.0,
            database_multi_az: false,
            object_storage_gb: 500.0,
            object_storage_tier: "standard".to_string(),
            block_storage_gb: 200.0,
            block_storage_tier: "ssd".to_string(),
            metrics: 10.0,
            alarms: 5.0,
            logs_gb: 10.0,
            retention_gb: 10.0,
        }
    }
}

/// Standard workload priced on one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadEstimate {
    pub provider_id: String,
    /// Sum of the line items, rounded to cents
    pub total: f64,
    pub currency: Currency,
    pub compute: CostEstimate,
    pub database: CostEstimate,
    pub object_storage: CostEstimate,
    pub block_storage: CostEstimate,
    pub observability: CostEstimate,
}

impl WorkloadEstimate {
    /// True when any line item fell back to a heuristic
    pub fn has_estimates(&self) -> bool {
        [
            &self.compute,
            &self.database,
            &self.object_storage,
            &self.block_storage,
            &self.observability,
        ]
        .iter()
        .any(|item| item.is_estimated())
    }
}

/// A single-service pricing request used for cross-provider comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum ServiceRequest {
    Compute {
        vcpu: f64,
        ram_gb: f64,
        #[serde(default)]
        sap_required: bool,
    },
    Database {
        engine: String,
        size_gb: f64,
        #[serde(default)]
        multi_az: bool,
    },
    Storage {
        class: StorageClass,
        size_gb: f64,
        #[serde(default = "default_tier")]
        tier: String,
    },
    Kubernetes {
        node_count: u32,
        #[serde(default = "default_node_vcpu")]
        node_vcpu: f64,
        #[serde(default = "default_node_ram")]
        node_ram: f64,
    },
    Observability {
        metrics: f64,
        alarms: f64,
        logs_gb: f64,
        retention_gb: f64,
    },
}

fn default_tier() -> String {
    "standard".to_string()
}

/// Worker node vCPU when a Kubernetes request does not specify one
pub const DEFAULT_NODE_VCPU: f64 = 4.0;
/// Worker node RAM (GB) when a Kubernetes request does not specify one
pub const DEFAULT_NODE_RAM: f64 = 16.0;

fn default_node_vcpu() -> f64 {
    DEFAULT_NODE_VCPU
}

fn default_node_ram() -> f64 {
    DEFAULT_NODE_RAM
}

/// One provider's answer to a [`ServiceRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderQuote {
    pub provider_id: String,
    pub provider_name: String,
    #[serde(flatten)]
    pub estimate: CostEstimate,
}
