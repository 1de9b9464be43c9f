use tracing::debug;

use crate::models::{SizeTier, SizingDetection};
use crate::normalize::{contains_phrase, normalize};
use crate::vocabulary::SizingKeywords;

const KEYWORD_CONFIDENCE: f64 = 0.8;
const DEFAULT_CONFIDENCE: f64 = 0.3;
const DEFAULT_KEYWORD: &str = "standard";

/// Classifies free text as small, medium or large
#[derive(Debug, Clone)]
pub struct SizingDetector {
    tiers: Vec<(SizeTier, Vec<String>)>,
}

impl SizingDetector {
    pub fn new(keywords: &SizingKeywords) -> Self {
        let tiers = keywords
            .tiers()
            .into_iter()
            .map(|(tier, words)| {
                let words = words
                    .iter()
                    .map(|w| normalize(w))
                    .filter(|w| !w.is_empty())
                    .collect();
                (tier, words)
            })
            .collect();
        Self { tiers }
    }

    /// First tier (small, then medium, then large) with a keyword present as a
    /// whole word or phrase wins. Without one the answer is a low-confidence
    /// medium.
    pub fn detect_sizing(&self, text: &str) -> SizingDetection {
        let normalized = normalize(text);

        for (tier, words) in &self.tiers {
            if let Some(keyword) = words.iter().find(|w| contains_phrase(&normalized, w)) {
                debug!(sizing = %tier, keyword = %keyword, "Detected sizing");
                return SizingDetection {
                    sizing: *tier,
                    confidence: KEYWORD_CONFIDENCE,
                    keyword: keyword.clone(),
                };
            }
        }

        SizingDetection {
            sizing: SizeTier::Medium,
            confidence: DEFAULT_CONFIDENCE,
            keyword: DEFAULT_KEYWORD.to_string(),
        }
    }
}
