use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

/// Currency the catalog is denominated in. Prices are never converted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, Hash,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Currency {
    Usd,
    #[default]
    Eur,
    Gbp,
}

/// Coarse classification of a provider, used when no observability pricing exists
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderCategory {
    /// Self-operated open infrastructure (OpenStack, on-prem Kubernetes)
    SelfHosted,
    /// Smaller European providers
    EuRegional,
    #[default]
    Hyperscaler,
}

impl ProviderCategory {
    /// Classify a provider id that has no catalog entry.
    pub fn infer(provider_id: &str) -> Self {
        const SELF_HOSTED: &[&str] = &["openstack", "onprem", "on-prem", "self-hosted", "proxmox", "vsphere"];
        const EU_REGIONAL: &[&str] = &[
            "hetzner", "ionos", "stackit", "otc", "scaleway", "ovh", "plusserver", "gridscale", "exoscale",
        ];

        let id = provider_id.trim().to_lowercase();
        if SELF_HOSTED.iter().any(|p| id.starts_with(p)) {
            ProviderCategory::SelfHosted
        } else if EU_REGIONAL.iter().any(|p| id.starts_with(p)) {
            ProviderCategory::EuRegional
        } else {
            ProviderCategory::Hyperscaler
        }
    }
}

/// A base provider listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: ProviderCategory,
}

/// Derived provider priced as base provider × premium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SovereignMapping {
    pub base_provider_id: String,
    /// Multiplicative premium, always > 1.0
    pub premium_factor: f64,
    #[serde(default)]
    pub name: Option<String>,
}

/// A concrete VM size from a provider's catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceType {
    pub name: String,
    pub vcpu: f64,
    /// RAM in GB
    pub ram: f64,
    /// Monthly price
    pub price: f64,
    #[serde(default)]
    pub sap_certified: bool,
}

impl InstanceType {
    pub fn fits(&self, vcpu: f64, ram_gb: f64) -> bool {
        self.vcpu >= vcpu && self.ram >= ram_gb
    }
}

/// Compute pricing for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderComputePricing {
    pub price_per_vcpu: f64,
    pub price_per_gb_ram: f64,
    /// Floor for the per-unit formula; never applied to a matched instance
    #[serde(default)]
    pub min_price: f64,
    /// Ordered as published by the provider
    #[serde(default)]
    pub instances: Vec<InstanceType>,
}

/// SAP HANA certified sizes for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HanaPricing {
    pub price_per_gb_ram: f64,
    #[serde(default)]
    pub instances: Vec<InstanceType>,
}

/// Managed database engine
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, Default, Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DatabaseEngine {
    #[default]
    Postgresql,
    Mysql,
    Oracle,
    Sqlserver,
    Aurora,
}

impl DatabaseEngine {
    /// Map a free-form engine name onto a priced engine.
    ///
    /// Substring rules are checked in a fixed order, so "aurora postgres" is
    /// priced as PostgreSQL. Anything unrecognised is priced as PostgreSQL.
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("postgres") {
            DatabaseEngine::Postgresql
        } else if name.contains("mysql") || name.contains("maria") {
            DatabaseEngine::Mysql
        } else if name.contains("oracle") {
            DatabaseEngine::Oracle
        } else if name.contains("sql server") || name.contains("mssql") {
            DatabaseEngine::Sqlserver
        } else if name.contains("aurora") {
            DatabaseEngine::Aurora
        } else {
            DatabaseEngine::Postgresql
        }
    }
}

/// Managed database pricing for one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseEnginePricing {
    pub base: f64,
    #[serde(default)]
    pub per_vcpu: f64,
    #[serde(default)]
    pub per_gb_ram: f64,
    pub storage_per_gb: f64,
    /// High-availability multiplier
    #[serde(default)]
    pub multi_az: Option<f64>,
}

/// Storage class requested by the caller
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, Default, Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageClass {
    #[default]
    Object,
    Block,
    File,
}

/// Tier name → price per GB-month, per storage class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoragePricing {
    #[serde(default)]
    pub object: BTreeMap<String, f64>,
    #[serde(default)]
    pub block: BTreeMap<String, f64>,
    #[serde(default)]
    pub file: BTreeMap<String, f64>,
}

impl StoragePricing {
    pub fn tiers(&self, class: StorageClass) -> &BTreeMap<String, f64> {
        match class {
            StorageClass::Object => &self.object,
            StorageClass::Block => &self.block,
            StorageClass::File => &self.file,
        }
    }
}

/// Managed Kubernetes pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KubernetesPricing {
    /// Monthly cluster management fee
    pub control_plane_monthly: f64,
}

/// Monitoring and logging pricing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityPricing {
    /// Flat monthly fee, common with smaller EU providers
    #[serde(default)]
    pub base_monthly: Option<f64>,
    #[serde(default)]
    pub metrics_per_month: f64,
    #[serde(default)]
    pub alarms_per_month: f64,
    #[serde(default)]
    pub ingestion_per_gb: f64,
    #[serde(default)]
    pub storage_per_gb: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_engine_name_normalization() {
        assert_eq!(DatabaseEngine::from_name("PostgreSQL 16"), DatabaseEngine::Postgresql);
        assert_eq!(DatabaseEngine::from_name("postgres"), DatabaseEngine::Postgresql);
        assert_eq!(DatabaseEngine::from_name("MariaDB"), DatabaseEngine::Mysql);
        assert_eq!(DatabaseEngine::from_name("mysql 8"), DatabaseEngine::Mysql);
        assert_eq!(DatabaseEngine::from_name("Oracle EE"), DatabaseEngine::Oracle);
        assert_eq!(DatabaseEngine::from_name("Microsoft SQL Server"), DatabaseEngine::Sqlserver);
        assert_eq!(DatabaseEngine::from_name("mssql"), DatabaseEngine::Sqlserver);
        assert_eq!(DatabaseEngine::from_name("Aurora"), DatabaseEngine::Aurora);
    }

    #[test]
    fn test_engine_name_priority_and_default() {
        // postgres wins over aurora
        assert_eq!(DatabaseEngine::from_name("aurora postgres"), DatabaseEngine::Postgresql);
        assert_eq!(DatabaseEngine::from_name("mongodb"), DatabaseEngine::Postgresql);
        assert_eq!(DatabaseEngine::from_name(""), DatabaseEngine::Postgresql);
    }

    #[test]
    fn test_storage_class_parsing() {
        assert_eq!(StorageClass::from_str("block").unwrap(), StorageClass::Block);
        assert_eq!(StorageClass::from_str("OBJECT").unwrap(), StorageClass::Object);
        assert!(StorageClass::from_str("tape").is_err());
    }

    #[test]
    fn test_provider_category_inference() {
        assert_eq!(ProviderCategory::infer("openstack"), ProviderCategory::SelfHosted);
        assert_eq!(ProviderCategory::infer("Hetzner"), ProviderCategory::EuRegional);
        assert_eq!(ProviderCategory::infer("stackit-eu01"), ProviderCategory::EuRegional);
        assert_eq!(ProviderCategory::infer("oracle-cloud"), ProviderCategory::Hyperscaler);
    }

    #[test]
    fn test_instance_fits() {
        let instance = InstanceType {
            name: "m6i.xlarge".to_string(),
            vcpu: 4.0,
            ram: 16.0,
            price: 154.0,
            sap_certified: true,
        };
        assert!(instance.fits(4.0, 16.0));
        assert!(instance.fits(2.0, 8.0));
        assert!(!instance.fits(4.0, 17.0));
        assert!(!instance.fits(8.0, 16.0));
    }
}
