//! Application Matcher Domain
//!
//! Resolves a free-text application name ("Gitlab klein", "wordprss") to known
//! reference applications, and classifies free text into a size tier.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐   ┌────────────────┐
//! │ ApplicationMatcher │   │ SizingDetector │  ← Query side, read-only
//! └─────────┬──────────┘   └───────┬────────┘
//!           │                      │
//! ┌─────────▼──────────┐   ┌───────▼───────────┐
//! │ KnownApplication[] │   │ KeywordVocabulary │  ← Versioned data files
//! └────────────────────┘   └───────────────────┘
//! ```

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod similarity;
pub mod sizing;
pub mod vocabulary;

pub use catalog::{ApplicationSource, BuiltinApplications, FileApplications};
pub use error::{MatcherError, MatcherResult};
pub use matcher::{ApplicationMatcher, DEFAULT_MAX_RESULTS};
pub use models::{
    ComputeProfile, DatabaseProfile, KnownApplication, MatchCandidate, MatchReason, SizeProfile,
    SizeTier, SizingDetection, StorageProfile, SystemRequirements,
};
pub use sizing::SizingDetector;
pub use vocabulary::{KeywordVocabulary, SizingKeywords};
