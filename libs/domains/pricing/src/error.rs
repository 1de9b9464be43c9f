use std::path::PathBuf;
use thiserror::Error;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while loading or validating a pricing catalog.
///
/// The calculators themselves never fail: missing catalog branches resolve to
/// heuristic estimates instead of errors.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Catalog file could not be read
    #[error("Failed to read pricing catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog document is not valid JSON for the catalog schema
    #[error("Failed to parse pricing catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog parsed but violates an invariant
    #[error("Invalid pricing catalog: {0}")]
    InvalidCatalog(String),

    /// Provider id is unknown to the catalog
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}
