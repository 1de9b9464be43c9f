use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Coarse workload size
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, Default, Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SizeTier {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeProfile {
    pub vcpu: f64,
    pub ram_gb: f64,
    /// Requires SAP-certified hardware
    #[serde(default)]
    pub sap_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseProfile {
    pub engine: String,
    pub size_gb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageProfile {
    pub size_gb: f64,
}

/// Resources an application needs at one size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute: Option<ComputeProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<SizeProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<SizeProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<SizeProfile>,
}

impl SystemRequirements {
    pub fn get(&self, tier: SizeTier) -> Option<&SizeProfile> {
        match tier {
            SizeTier::Small => self.small.as_ref(),
            SizeTier::Medium => self.medium.as_ref(),
            SizeTier::Large => self.large.as_ref(),
        }
    }

    /// Profile for `tier`, else the nearest defined one (medium first)
    pub fn get_or_nearest(&self, tier: SizeTier) -> Option<(SizeTier, &SizeProfile)> {
        let order: &[SizeTier] = match tier {
            SizeTier::Small => &[SizeTier::Small, SizeTier::Medium, SizeTier::Large],
            SizeTier::Medium => &[SizeTier::Medium, SizeTier::Small, SizeTier::Large],
            SizeTier::Large => &[SizeTier::Large, SizeTier::Medium, SizeTier::Small],
        };
        order
            .iter()
            .find_map(|tier| self.get(*tier).map(|profile| (*tier, profile)))
    }
}

/// A reference application users are matched against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownApplication {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub components: BTreeSet<String>,
    #[serde(default)]
    pub system_requirements: SystemRequirements,
}

/// Why an application was matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchReason {
    /// Normalized input equals the application name or id
    Exact,
    /// Curated keywords or name tokens found in the input
    Keyword { terms: Vec<String> },
    /// Closest edit distance to a name or id word
    Fuzzy { term: String, similarity: f64 },
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchReason::Exact => write!(f, "exact name match"),
            MatchReason::Keyword { terms } => write!(f, "keyword match: {}", terms.join(", ")),
            MatchReason::Fuzzy { term, similarity } => {
                write!(f, "similar to '{}' ({:.0}%)", term, similarity * 100.0)
            }
        }
    }
}

/// One ranked match, borrowing the application from the matcher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate<'a> {
    pub id: &'a str,
    pub application: &'a KnownApplication,
    /// In `[0, 1]`
    pub confidence: f64,
    pub reason: MatchReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingDetection {
    pub sizing: SizeTier,
    pub confidence: f64,
    /// Keyword that decided the tier, `standard` when none did
    pub keyword: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn profile(vcpu: f64) -> SizeProfile {
        SizeProfile {
            compute: Some(ComputeProfile {
                vcpu,
                ram_gb: vcpu * 4.0,
                sap_required: false,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_size_tier_parsing() {
        assert_eq!(SizeTier::from_str("LARGE").unwrap(), SizeTier::Large);
        assert_eq!(SizeTier::default(), SizeTier::Medium);
        assert_eq!(SizeTier::Small.to_string(), "small");
    }

    #[test]
    fn test_nearest_profile() {
        let requirements = SystemRequirements {
            small: Some(profile(2.0)),
            medium: None,
            large: Some(profile(8.0)),
        };

        let (tier, _) = requirements.get_or_nearest(SizeTier::Medium).unwrap();
        assert_eq!(tier, SizeTier::Small);
        let (tier, found) = requirements.get_or_nearest(SizeTier::Large).unwrap();
        assert_eq!(tier, SizeTier::Large);
        assert_eq!(found.compute.as_ref().map(|c| c.vcpu), Some(8.0));
        assert!(SystemRequirements::default().get_or_nearest(SizeTier::Small).is_none());
    }

    #[test]
    fn test_application_defaults() {
        let app: KnownApplication =
            serde_json::from_str(r#"{"id": "matomo", "name": "Matomo"}"#).unwrap();
        assert!(app.components.is_empty());
        assert!(app.description.is_empty());
        assert_eq!(app.system_requirements, SystemRequirements::default());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(MatchReason::Exact.to_string(), "exact name match");
        let keyword = MatchReason::Keyword {
            terms: vec!["wiki".to_string(), "confluence".to_string()],
        };
        assert_eq!(keyword.to_string(), "keyword match: wiki, confluence");
        let fuzzy = MatchReason::Fuzzy {
            term: "wordpress".to_string(),
            similarity: 0.889,
        };
        assert_eq!(fuzzy.to_string(), "similar to 'wordpress' (89%)");
    }
}
