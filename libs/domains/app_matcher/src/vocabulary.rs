//! Curated keyword vocabulary: versioned data, separate from the matcher

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::error::{MatcherError, MatcherResult};
use crate::models::SizeTier;
use crate::normalize::normalize;

const BUILTIN_VOCABULARY: &str = include_str!("../data/vocabulary.json");

fn default_token_weight() -> f64 {
    0.5
}

/// Keyword lists per size tier, checked small → medium → large
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizingKeywords {
    #[serde(default)]
    pub small: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub large: Vec<String>,
}

impl SizingKeywords {
    pub fn tiers(&self) -> [(SizeTier, &[String]); 3] {
        [
            (SizeTier::Small, self.small.as_slice()),
            (SizeTier::Medium, self.medium.as_slice()),
            (SizeTier::Large, self.large.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordVocabulary {
    pub version: String,
    /// Keyword → index weight
    #[serde(default)]
    pub keywords: BTreeMap<String, f64>,
    /// Index weight of a plain name token
    #[serde(default = "default_token_weight")]
    pub token_weight: f64,
    /// Words stripped from the input before matching
    #[serde(default)]
    pub size_qualifiers: Vec<String>,
    #[serde(default)]
    pub sizing: SizingKeywords,
}

impl KeywordVocabulary {
    pub fn builtin() -> MatcherResult<Self> {
        Self::from_json_str(BUILTIN_VOCABULARY)
    }

    pub fn from_json_str(json: &str) -> MatcherResult<Self> {
        let vocabulary: KeywordVocabulary = serde_json::from_str(json)?;
        vocabulary.validate()?;
        info!(
            version = %vocabulary.version,
            keywords = vocabulary.keywords.len(),
            qualifiers = vocabulary.size_qualifiers.len(),
            "Loaded keyword vocabulary"
        );
        Ok(vocabulary)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MatcherResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| MatcherError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Keywords must already be in normalized form and carry positive weights
    pub fn validate(&self) -> MatcherResult<()> {
        for (keyword, weight) in &self.keywords {
            if keyword.is_empty() || normalize(keyword) != *keyword {
                return Err(MatcherError::InvalidVocabulary(format!(
                    "keyword '{}' is not normalized",
                    keyword
                )));
            }
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(MatcherError::InvalidVocabulary(format!(
                    "keyword '{}' has weight {}",
                    keyword, weight
                )));
            }
        }
        if !self.token_weight.is_finite() || self.token_weight <= 0.0 {
            return Err(MatcherError::InvalidVocabulary(format!(
                "token weight {} must be positive",
                self.token_weight
            )));
        }
        Ok(())
    }
}
