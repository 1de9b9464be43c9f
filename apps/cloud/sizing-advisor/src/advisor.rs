//! Composes the pricing and application-matching domains

use std::sync::Arc;

use domain_app_matcher::catalog::builtin_applications;
use domain_app_matcher::{
    ApplicationMatcher, ApplicationSource, BuiltinApplications, FileApplications,
    KeywordVocabulary, MatchCandidate, SizeProfile, SizeTier, SizingDetection, SizingDetector,
};
use domain_pricing::{
    BuiltinCatalog, CatalogSource, CostEstimator, FileCatalog, WorkloadConfig, WorkloadEstimate,
};
use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::AdvisorConfig;

/// Outcome of `advise`: what was understood from the text and what it costs
#[derive(Debug, Serialize)]
pub struct Advice<'a> {
    pub input: String,
    pub sizing: SizingDetection,
    pub matches: Vec<MatchCandidate<'a>>,
    /// Tier of the profile actually priced; differs from `sizing` when the
    /// application lacks a profile for the detected tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_tier: Option<SizeTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<WorkloadConfig>,
    /// Cheapest first
    pub estimates: Vec<WorkloadEstimate>,
}

pub struct Advisor {
    estimator: CostEstimator,
    matcher: ApplicationMatcher,
    sizing: SizingDetector,
}

impl Advisor {
    pub fn new(estimator: CostEstimator, matcher: ApplicationMatcher, sizing: SizingDetector) -> Self {
        Self {
            estimator,
            matcher,
            sizing,
        }
    }

    /// Load every dataset named by the config, falling back to the built-in ones
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        let catalog_source: Box<dyn CatalogSource> = match &config.pricing_catalog_path {
            Some(path) => Box::new(FileCatalog::new(path)),
            None => Box::new(BuiltinCatalog),
        };
        let catalog = catalog_source
            .load()
            .wrap_err_with(|| format!("Failed to load pricing catalog from {}", catalog_source.describe()))?;

        let application_source: Box<dyn ApplicationSource> = match &config.application_catalog_path {
            Some(path) => Box::new(FileApplications::new(path)),
            None => Box::new(BuiltinApplications),
        };
        let applications = application_source.load().wrap_err_with(|| {
            format!("Failed to load applications from {}", application_source.describe())
        })?;

        let vocabulary = match &config.vocabulary_path {
            Some(path) => KeywordVocabulary::from_path(path),
            None => KeywordVocabulary::builtin(),
        }
        .wrap_err("Failed to load keyword vocabulary")?;

        info!(
            catalog = %catalog_source.describe(),
            applications = %application_source.describe(),
            "Advisor data loaded"
        );

        let matcher = ApplicationMatcher::new(applications, &vocabulary)
            .wrap_err("Failed to build application matcher")?
            .with_max_results(config.max_matches);

        Ok(Self::new(
            CostEstimator::new(Arc::new(catalog)),
            matcher,
            SizingDetector::new(&vocabulary.sizing),
        ))
    }

    /// Built-in datasets only
    pub fn builtin() -> Result<Self> {
        let vocabulary = KeywordVocabulary::builtin()?;
        let matcher = ApplicationMatcher::new(builtin_applications()?, &vocabulary)?;
        let catalog = domain_pricing::PricingCatalog::builtin()?;
        Ok(Self::new(
            CostEstimator::new(Arc::new(catalog)),
            matcher,
            SizingDetector::new(&vocabulary.sizing),
        ))
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    pub fn matcher(&self) -> &ApplicationMatcher {
        &self.matcher
    }

    pub fn sizing(&self) -> &SizingDetector {
        &self.sizing
    }

    /// Detect size, match the application, and price the top match's profile
    /// on `providers` (every catalog provider when empty).
    #[instrument(skip(self))]
    pub fn advise(&self, text: &str, providers: &[String]) -> Advice<'_> {
        let sizing = self.sizing.detect_sizing(text);
        let matches = self.matcher.match_application(text);

        let profile = matches.first().and_then(|top| {
            top.application
                .system_requirements
                .get_or_nearest(sizing.sizing)
        });

        let (profile_tier, workload, estimates) = match profile {
            Some((tier, profile)) => {
                let workload = workload_for(profile);
                let estimates = self.price(&workload, providers);
                (Some(tier), Some(workload), estimates)
            }
            None => (None, None, Vec::new()),
        };

        Advice {
            input: text.to_string(),
            sizing,
            matches,
            profile_tier,
            workload,
            estimates,
        }
    }

    /// Standard workload on the given providers, cheapest first
    pub fn price(&self, workload: &WorkloadConfig, providers: &[String]) -> Vec<WorkloadEstimate> {
        if providers.is_empty() {
            return self.estimator.compare_standard_workload(workload);
        }
        let mut estimates: Vec<WorkloadEstimate> = providers
            .iter()
            .map(|id| self.estimator.standard_workload(id, workload))
            .collect();
        estimates.sort_by(|a, b| a.total.total_cmp(&b.total));
        estimates
    }
}

/// Standard workload shaped by an application size profile. Parts the
/// profile leaves out keep the standard defaults; its storage becomes the
/// block volume.
pub fn workload_for(profile: &SizeProfile) -> WorkloadConfig {
    let mut workload = WorkloadConfig::default();
    if let Some(compute) = &profile.compute {
        workload.vcpu = compute.vcpu;
        workload.ram_gb = compute.ram_gb;
        workload.sap_required = compute.sap_required;
    }
    if let Some(database) = &profile.database {
        workload.database_engine = database.engine.clone();
        workload.database_size_gb = database.size_gb;
    }
    if let Some(storage) = &profile.storage {
        workload.block_storage_gb = storage.size_gb;
    }
    workload
}
