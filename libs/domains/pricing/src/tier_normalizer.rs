//! Canonical storage tier → provider-native tier key

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Provider-neutral storage tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CanonicalTier {
    Ssd,
    Hdd,
    Nvme,
}

impl CanonicalTier {
    pub fn parse(tier: &str) -> Option<Self> {
        Self::from_str(tier.trim()).ok()
    }
}

/// Built-in native keys, per provider id
const DEFAULT_TABLE: &[(CanonicalTier, &str, &str)] = &[
    (CanonicalTier::Ssd, "aws", "gp3"),
    (CanonicalTier::Hdd, "aws", "st1"),
    (CanonicalTier::Nvme, "aws", "io2"),
    (CanonicalTier::Ssd, "azure", "premiumSSD"),
    (CanonicalTier::Hdd, "azure", "standardHDD"),
    (CanonicalTier::Nvme, "azure", "ultraSSD"),
    (CanonicalTier::Ssd, "gcp", "pdSSD"),
    (CanonicalTier::Hdd, "gcp", "pdStandard"),
    (CanonicalTier::Nvme, "gcp", "hyperdiskExtreme"),
    (CanonicalTier::Ssd, "hetzner", "ssd"),
    (CanonicalTier::Ssd, "ionos", "ssdStandard"),
    (CanonicalTier::Hdd, "ionos", "hdd"),
    (CanonicalTier::Nvme, "ionos", "ssdPremium"),
    (CanonicalTier::Ssd, "stackit", "perf1"),
    (CanonicalTier::Nvme, "stackit", "perf6"),
    (CanonicalTier::Ssd, "otc", "GPSSD"),
    (CanonicalTier::Hdd, "otc", "SATA"),
    (CanonicalTier::Nvme, "otc", "ESSD"),
];

/// Lookup table keyed by canonical tier × base provider id.
///
/// Sovereign providers are resolved to their base provider before lookup, so
/// they never need entries of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct TierNormalizer {
    table: HashMap<(CanonicalTier, String), String>,
}

impl Default for TierNormalizer {
    fn default() -> Self {
        let table = DEFAULT_TABLE
            .iter()
            .map(|(tier, provider, key)| ((*tier, provider.to_string()), key.to_string()))
            .collect();
        Self { table }
    }
}

impl TierNormalizer {
    /// A normalizer without any mappings
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Add or replace one mapping
    pub fn with_alias(mut self, tier: CanonicalTier, provider_id: &str, native_key: &str) -> Self {
        self.table
            .insert((tier, provider_id.to_lowercase()), native_key.to_string());
        self
    }

    /// Merge catalog-supplied aliases (`provider → canonical → native`) on top.
    /// Unknown canonical names are ignored.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, BTreeMap<String, String>>) -> Self {
        for (provider_id, aliases) in overrides {
            for (canonical, native_key) in aliases {
                match CanonicalTier::parse(canonical) {
                    Some(tier) => {
                        self.table
                            .insert((tier, provider_id.to_lowercase()), native_key.clone());
                    }
                    None => {
                        tracing::warn!(
                            provider = %provider_id,
                            tier = %canonical,
                            "Ignoring tier alias for unknown canonical tier"
                        );
                    }
                }
            }
        }
        self
    }

    /// Native key for a canonical tier on a provider
    pub fn native_key(&self, tier: CanonicalTier, provider_id: &str) -> Option<&str> {
        self.table
            .get(&(tier, provider_id.to_lowercase()))
            .map(String::as_str)
    }

    /// Resolve a caller-supplied tier string. Returns `None` when the string is
    /// not a canonical tier or the provider has no mapping for it.
    pub fn resolve(&self, tier: &str, provider_id: &str) -> Option<&str> {
        CanonicalTier::parse(tier).and_then(|canonical| self.native_key(canonical, provider_id))
    }

    /// All `(tier, provider, native key)` entries, sorted
    pub fn entries(&self) -> Vec<(CanonicalTier, &str, &str)> {
        let mut entries: Vec<_> = self
            .table
            .iter()
            .map(|((tier, provider), key)| (*tier, provider.as_str(), key.as_str()))
            .collect();
        entries.sort_by(|a, b| (a.1, a.0.to_string()).cmp(&(b.1, b.0.to_string())));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_family_mappings() {
        let tiers = TierNormalizer::default();
        assert_eq!(tiers.resolve("ssd", "aws"), Some("gp3"));
        assert_eq!(tiers.resolve("ssd", "azure"), Some("premiumSSD"));
        assert_eq!(tiers.resolve("ssd", "gcp"), Some("pdSSD"));
        assert_eq!(tiers.resolve("nvme", "aws"), Some("io2"));
        assert_eq!(tiers.resolve("hdd", "gcp"), Some("pdStandard"));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let tiers = TierNormalizer::default();
        assert_eq!(tiers.resolve("SSD", "AWS"), Some("gp3"));
        assert_eq!(tiers.resolve(" Nvme ", "gcp"), Some("hyperdiskExtreme"));
    }

    #[test]
    fn test_non_canonical_and_unmapped() {
        let tiers = TierNormalizer::default();
        assert_eq!(tiers.resolve("standard", "aws"), None);
        assert_eq!(tiers.resolve("gp3", "aws"), None);
        assert_eq!(tiers.resolve("hdd", "hetzner"), None);
        assert_eq!(tiers.resolve("ssd", "unknown-cloud"), None);
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "aws".to_string(),
            BTreeMap::from([
                ("ssd".to_string(), "gp2".to_string()),
                ("tape".to_string(), "glacier".to_string()),
            ]),
        );
        overrides.insert(
            "scaleway".to_string(),
            BTreeMap::from([("ssd".to_string(), "sbs_5k".to_string())]),
        );

        let tiers = TierNormalizer::default().with_overrides(&overrides);
        assert_eq!(tiers.resolve("ssd", "aws"), Some("gp2"));
        assert_eq!(tiers.resolve("ssd", "scaleway"), Some("sbs_5k"));
        assert_eq!(tiers.resolve("hdd", "aws"), Some("st1"));
    }

    #[test]
    fn test_with_alias_and_entries() {
        let tiers = TierNormalizer::empty().with_alias(CanonicalTier::Ssd, "Local", "fast");
        assert_eq!(tiers.native_key(CanonicalTier::Ssd, "local"), Some("fast"));
        assert_eq!(tiers.entries(), vec![(CanonicalTier::Ssd, "local", "fast")]);
    }
}
