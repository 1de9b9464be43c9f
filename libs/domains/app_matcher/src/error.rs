use std::path::PathBuf;
use thiserror::Error;

/// Result type for matcher construction
pub type MatcherResult<T> = Result<T, MatcherError>;

/// Errors raised while loading reference data or building indices.
///
/// Matching itself never fails; unmatched input yields an empty list.
#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse matcher data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid keyword vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Invalid application catalog: {0}")]
    InvalidCatalog(String),

    /// Size qualifier pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
