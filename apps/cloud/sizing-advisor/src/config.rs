//! Configuration for the sizing advisor

use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or};
use std::path::PathBuf;

const DEFAULT_PROVIDER: &str = "aws";
const DEFAULT_MAX_MATCHES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    /// Pricing catalog JSON; the built-in catalog when unset
    pub pricing_catalog_path: Option<PathBuf>,
    /// Known applications JSON; the built-in list when unset
    pub application_catalog_path: Option<PathBuf>,
    /// Keyword vocabulary JSON; the built-in vocabulary when unset
    pub vocabulary_path: Option<PathBuf>,
    /// Provider used when a command gets no `--provider`
    pub default_provider: String,
    pub max_matches: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            pricing_catalog_path: None,
            application_catalog_path: None,
            vocabulary_path: None,
            default_provider: DEFAULT_PROVIDER.to_string(),
            max_matches: DEFAULT_MAX_MATCHES,
        }
    }
}

impl FromEnv for AdvisorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_matches = env_parse_or("ADVISOR_MAX_MATCHES", DEFAULT_MAX_MATCHES)?;
        if max_matches == 0 {
            return Err(ConfigError::ParseError {
                key: "ADVISOR_MAX_MATCHES".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            pricing_catalog_path: env_optional("PRICING_CATALOG_PATH").map(PathBuf::from),
            application_catalog_path: env_optional("APPLICATION_CATALOG_PATH").map(PathBuf::from),
            vocabulary_path: env_optional("MATCHER_VOCABULARY_PATH").map(PathBuf::from),
            default_provider: env_or_default("ADVISOR_DEFAULT_PROVIDER", DEFAULT_PROVIDER)
                .trim()
                .to_lowercase(),
            max_matches,
        })
    }
}
