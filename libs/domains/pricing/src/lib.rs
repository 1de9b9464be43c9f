//! Pricing Domain
//!
//! Monthly cost estimation across independently priced cloud providers.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐
//! │ CostEstimator  │  ← Per-service calculators, workload, comparison
//! └───────┬────────┘
//!         │
//! ┌───────▼────────┐   ┌────────────────┐
//! │ PricingCatalog │   │ TierNormalizer │  ← Immutable reference data
//! └───────┬────────┘   └────────────────┘
//!         │
//! ┌───────▼────────┐
//! │     Models     │  ← Catalog entries, requests, estimates
//! └────────────────┘
//! ```
//!
//! ```
//! use std::sync::Arc;
//! use domain_pricing::{CostEstimator, PricingCatalog};
//!
//! let catalog = PricingCatalog::builtin().unwrap();
//! let estimator = CostEstimator::new(Arc::new(catalog));
//! let estimate = estimator.compute_cost("aws", 4.0, 16.0, false);
//! assert!(estimate.price > 0.0);
//! ```

pub mod catalog;
pub mod error;
pub mod estimate;
pub mod estimator;
pub mod models;
pub mod tier_normalizer;

// Re-export commonly used types
pub use catalog::{BuiltinCatalog, CatalogSource, FileCatalog, PricingCatalog, ResolvedProvider};
pub use error::{PricingError, PricingResult};
pub use estimate::{
    CostEstimate, KubernetesDetails, KubernetesEstimate, PriceSource, ProviderQuote,
    RoundingPolicy, ServiceRequest, WorkloadConfig, WorkloadEstimate,
};
pub use estimator::CostEstimator;
pub use models::{
    Currency, DatabaseEngine, InstanceType, ProviderCategory, ProviderInfo, SovereignMapping,
    StorageClass,
};
pub use tier_normalizer::{CanonicalTier, TierNormalizer};
