//! Pricing catalog: the immutable reference dataset the calculators read

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{PricingError, PricingResult};
use crate::models::{
    Currency, DatabaseEngine, DatabaseEnginePricing, HanaPricing, KubernetesPricing,
    ObservabilityPricing, ProviderCategory, ProviderComputePricing, ProviderInfo,
    SovereignMapping, StoragePricing,
};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Versioned per-provider pricing tables.
///
/// Every branch is optional per provider; the calculators fall back to
/// heuristics for whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingCatalog {
    pub version: String,
    #[serde(default)]
    pub currency: Currency,
    /// Base providers, in comparison order
    #[serde(default)]
    pub providers: Vec<ProviderInfo>,
    /// Derived provider id → base provider and premium
    #[serde(default)]
    pub sovereign: BTreeMap<String, SovereignMapping>,
    #[serde(default)]
    pub compute: HashMap<String, ProviderComputePricing>,
    #[serde(default)]
    pub hana: HashMap<String, HanaPricing>,
    /// Provider → engine key (`postgresql`, `mysql`, ...) → pricing
    #[serde(default)]
    pub database: HashMap<String, BTreeMap<String, DatabaseEnginePricing>>,
    #[serde(default)]
    pub storage: HashMap<String, StoragePricing>,
    #[serde(default)]
    pub kubernetes: HashMap<String, KubernetesPricing>,
    #[serde(default)]
    pub observability: HashMap<String, ObservabilityPricing>,
    /// Provider → canonical tier → native key, merged over the built-in table
    #[serde(default)]
    pub tier_aliases: BTreeMap<String, BTreeMap<String, String>>,
}

/// Outcome of sovereign resolution for a requested provider id
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvider {
    /// Id as requested, lower-cased and trimmed
    pub requested: String,
    /// Id used for every catalog lookup
    pub source_id: String,
    /// 1.0 for base providers
    pub premium_factor: f64,
}

impl ResolvedProvider {
    pub fn is_sovereign(&self) -> bool {
        self.requested != self.source_id
    }
}

impl PricingCatalog {
    /// The catalog shipped with this crate
    pub fn builtin() -> PricingResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> PricingResult<Self> {
        let catalog: PricingCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        info!(
            version = %catalog.version,
            providers = catalog.providers.len(),
            sovereign = catalog.sovereign.len(),
            "Loaded pricing catalog"
        );
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PricingResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PricingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check catalog invariants
    pub fn validate(&self) -> PricingResult<()> {
        let ids = self.providers.iter().map(|p| &p.id).chain(self.sovereign.keys());
        for id in ids {
            if id.trim() != id.to_lowercase() {
                return Err(PricingError::InvalidCatalog(format!(
                    "provider id '{}' must be lower-case without surrounding whitespace",
                    id
                )));
            }
        }

        for (id, mapping) in &self.sovereign {
            if !mapping.premium_factor.is_finite() || mapping.premium_factor <= 1.0 {
                return Err(PricingError::InvalidCatalog(format!(
                    "sovereign provider '{}' has premium factor {} (must be > 1.0)",
                    id, mapping.premium_factor
                )));
            }
            if self.providers.iter().any(|p| p.id.eq_ignore_ascii_case(id)) {
                return Err(PricingError::InvalidCatalog(format!(
                    "sovereign provider '{}' shadows a base provider",
                    id
                )));
            }
            if self.sovereign.contains_key(&mapping.base_provider_id.to_lowercase()) {
                return Err(PricingError::InvalidCatalog(format!(
                    "sovereign provider '{}' maps onto another sovereign provider",
                    id
                )));
            }
        }
        Ok(())
    }

    /// Resolve the catalog source and premium for a provider id.
    /// Unknown ids resolve to themselves with no premium.
    pub fn resolve(&self, provider_id: &str) -> ResolvedProvider {
        let requested = provider_id.trim().to_lowercase();
        match self.sovereign.get(&requested) {
            Some(mapping) => ResolvedProvider {
                source_id: mapping.base_provider_id.to_lowercase(),
                premium_factor: mapping.premium_factor,
                requested,
            },
            None => ResolvedProvider {
                source_id: requested.clone(),
                premium_factor: 1.0,
                requested,
            },
        }
    }

    /// Like [`resolve`](Self::resolve), but rejects ids the catalog does not list.
    pub fn require_provider(&self, provider_id: &str) -> PricingResult<ResolvedProvider> {
        let resolved = self.resolve(provider_id);
        if self.is_known(&resolved.requested) {
            Ok(resolved)
        } else {
            Err(PricingError::UnknownProvider(provider_id.to_string()))
        }
    }

    pub fn is_known(&self, provider_id: &str) -> bool {
        let id = provider_id.trim().to_lowercase();
        self.sovereign.contains_key(&id) || self.providers.iter().any(|p| p.id == id)
    }

    /// Base providers in catalog order, then sovereign providers by id
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.id.clone())
            .chain(self.sovereign.keys().cloned())
            .collect()
    }

    /// Display name for any provider id
    pub fn provider_name(&self, provider_id: &str) -> String {
        let id = provider_id.trim().to_lowercase();
        if let Some(mapping) = self.sovereign.get(&id) {
            if let Some(name) = &mapping.name {
                return name.clone();
            }
            return format!("{} (sovereign)", self.provider_name(&mapping.base_provider_id));
        }
        self.providers
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or(id)
    }

    /// Category of a base provider, inferred from the id when not listed
    pub fn provider_category(&self, source_id: &str) -> ProviderCategory {
        self.providers
            .iter()
            .find(|p| p.id == source_id)
            .map(|p| p.category)
            .unwrap_or_else(|| ProviderCategory::infer(source_id))
    }

    pub fn database_pricing(
        &self,
        source_id: &str,
        engine: DatabaseEngine,
    ) -> Option<&DatabaseEnginePricing> {
        self.database
            .get(source_id)
            .and_then(|engines| engines.get(&engine.to_string()))
    }
}

/// Where a catalog comes from
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> PricingResult<PricingCatalog>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// The catalog embedded in this crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl CatalogSource for BuiltinCatalog {
    fn load(&self) -> PricingResult<PricingCatalog> {
        PricingCatalog::builtin()
    }

    fn describe(&self) -> String {
        "builtin".to_string()
    }
}

/// A catalog JSON file on disk
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalog {
    fn load(&self) -> PricingResult<PricingCatalog> {
        PricingCatalog::from_path(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
