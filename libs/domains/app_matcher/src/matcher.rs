//! Application matcher
//!
//! Resolves free text to known applications in three stages: exact name or
//! id, curated keywords plus name tokens, then edit-distance similarity.

use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

use crate::error::MatcherResult;
use crate::models::{KnownApplication, MatchCandidate, MatchReason};
use crate::normalize::{QualifierStripper, normalize, significant_words, split_identifier};
use crate::similarity::window_similarity;
use crate::vocabulary::KeywordVocabulary;

pub const DEFAULT_MAX_RESULTS: usize = 3;

const KEYWORD_BASE: f64 = 0.7;
const KEYWORD_PER_TERM: f64 = 0.1;
const KEYWORD_NAME_BONUS: f64 = 0.15;
const KEYWORD_CAP: f64 = 0.98;
const FUZZY_THRESHOLD: f64 = 0.6;
const FUZZY_SCALE: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Posting {
    app: usize,
    weight: f64,
}

#[derive(Debug, Default)]
struct KeywordHit {
    terms: Vec<String>,
    weight: f64,
}

impl KeywordHit {
    fn add(&mut self, term: &str, weight: f64) {
        if !self.terms.iter().any(|t| t == term) {
            self.terms.push(term.to_string());
            self.weight += weight;
        }
    }
}

#[derive(Debug)]
struct Scored {
    app: usize,
    confidence: f64,
    reason: MatchReason,
}

/// Indices over an immutable application list. Built once, then read-only.
#[derive(Debug, Clone)]
pub struct ApplicationMatcher {
    applications: Vec<KnownApplication>,
    normalized_names: Vec<String>,
    exact: HashMap<String, usize>,
    keyword_index: BTreeMap<String, Vec<Posting>>,
    token_index: HashMap<String, Vec<Posting>>,
    /// Name and id words per application, for the fuzzy stage
    fuzzy_words: Vec<Vec<String>>,
    stripper: QualifierStripper,
    max_results: usize,
}

impl ApplicationMatcher {
    pub fn new(applications: Vec<KnownApplication>, vocabulary: &KeywordVocabulary) -> MatcherResult<Self> {
        let stripper = QualifierStripper::new(&vocabulary.size_qualifiers)?;

        let normalized_names: Vec<String> = applications.iter().map(|app| normalize(&app.name)).collect();

        let mut exact: HashMap<String, usize> = HashMap::new();
        for (idx, app) in applications.iter().enumerate() {
            let keys = [
                normalized_names[idx].clone(),
                split_identifier(&app.name).join(" "),
                normalize(&app.id),
                split_identifier(&app.id).join(" "),
            ];
            for key in keys.into_iter().filter(|k| !k.is_empty()) {
                if let Some(existing) = exact.get(&key) {
                    if *existing != idx {
                        debug!(key = %key, kept = %applications[*existing].id, "Duplicate exact key");
                    }
                    continue;
                }
                exact.insert(key, idx);
            }
        }

        let mut keyword_index: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        for (idx, app) in applications.iter().enumerate() {
            let text = format!("{} {}", normalized_names[idx], normalize(&app.description));
            for (keyword, weight) in &vocabulary.keywords {
                if text.contains(keyword.as_str()) {
                    keyword_index.entry(keyword.clone()).or_default().push(Posting {
                        app: idx,
                        weight: *weight,
                    });
                }
            }
        }

        let mut token_index: HashMap<String, Vec<Posting>> = HashMap::new();
        for (idx, name) in normalized_names.iter().enumerate() {
            for token in significant_words(name) {
                let postings = token_index.entry(token.to_string()).or_default();
                if !postings.iter().any(|p| p.app == idx) {
                    postings.push(Posting {
                        app: idx,
                        weight: vocabulary.token_weight,
                    });
                }
            }
        }

        let fuzzy_words = applications
            .iter()
            .map(|app| {
                let mut words = split_identifier(&app.name);
                for word in split_identifier(&app.id) {
                    if !words.contains(&word) {
                        words.push(word);
                    }
                }
                words
            })
            .collect();

        info!(
            applications = applications.len(),
            exact_keys = exact.len(),
            keywords = keyword_index.len(),
            tokens = token_index.len(),
            "Built application matcher indices"
        );

        Ok(Self {
            applications,
            normalized_names,
            exact,
            keyword_index,
            token_index,
            fuzzy_words,
            stripper,
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    /// Cap the number of returned candidates (at least one)
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn applications(&self) -> &[KnownApplication] {
        &self.applications
    }

    pub fn get(&self, id: &str) -> Option<&KnownApplication> {
        self.applications.iter().find(|app| app.id.eq_ignore_ascii_case(id))
    }

    /// Rank known applications against free text, best first.
    ///
    /// Size qualifiers are stripped first. An exact name or id hit is returned
    /// alone with confidence 1.0; otherwise keyword and fuzzy candidates are
    /// merged. Empty or unmatched input gives an empty list.
    pub fn match_application(&self, text: &str) -> Vec<MatchCandidate<'_>> {
        let query = self.stripper.strip(text);
        if query.is_empty() {
            debug!(input = text, "Nothing left to match after stripping qualifiers");
            return Vec::new();
        }

        if let Some(&idx) = self.exact.get(&query) {
            debug!(query = %query, application = %self.applications[idx].id, "Exact match");
            return vec![self.candidate(Scored {
                app: idx,
                confidence: 1.0,
                reason: MatchReason::Exact,
            })];
        }

        let keyword = self.keyword_stage(&query);
        let matched: HashSet<usize> = keyword.iter().map(|s| s.app).collect();
        let fuzzy = self.fuzzy_stage(&query, &matched);

        let mut seen = HashSet::new();
        let mut merged: Vec<Scored> = keyword
            .into_iter()
            .chain(fuzzy)
            .filter(|scored| seen.insert(scored.app))
            .collect();
        merged.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        merged.truncate(self.max_results);

        debug!(query = %query, candidates = merged.len(), "Matched application");
        merged.into_iter().map(|scored| self.candidate(scored)).collect()
    }

    /// Keyword candidates, ordered by confidence then accumulated weight
    fn keyword_stage(&self, query: &str) -> Vec<Scored> {
        let mut hits: BTreeMap<usize, KeywordHit> = BTreeMap::new();

        for (keyword, postings) in &self.keyword_index {
            if query.contains(keyword.as_str()) {
                for posting in postings {
                    hits.entry(posting.app).or_default().add(keyword, posting.weight);
                }
            }
        }
        for word in significant_words(query) {
            for posting in self.token_index.get(word).into_iter().flatten() {
                hits.entry(posting.app).or_default().add(word, posting.weight);
            }
        }

        let mut scored: Vec<(Scored, f64)> = hits
            .into_iter()
            .map(|(app, hit)| {
                let name = &self.normalized_names[app];
                let name_bonus = hit.terms.iter().filter(|term| name.contains(term.as_str())).count();
                let confidence = (KEYWORD_BASE
                    + KEYWORD_PER_TERM * hit.terms.len() as f64
                    + KEYWORD_NAME_BONUS * name_bonus as f64)
                    .min(KEYWORD_CAP);
                let scored = Scored {
                    app,
                    confidence,
                    reason: MatchReason::Keyword { terms: hit.terms },
                };
                (scored, hit.weight)
            })
            .collect();

        scored.sort_by(|(a, a_weight), (b, b_weight)| {
            b.confidence
                .total_cmp(&a.confidence)
                .then(b_weight.total_cmp(a_weight))
        });
        scored.into_iter().map(|(s, _)| s).collect()
    }

    /// Edit-distance candidates among applications the keyword stage missed
    fn fuzzy_stage(&self, query: &str, exclude: &HashSet<usize>) -> Vec<Scored> {
        let mut inputs = vec![query.to_string()];
        for word in significant_words(query) {
            if word != query {
                inputs.push(word.to_string());
            }
        }

        let mut scored: Vec<Scored> = self
            .fuzzy_words
            .iter()
            .enumerate()
            .filter(|(app, _)| !exclude.contains(app))
            .filter_map(|(app, words)| {
                let (term, similarity) = inputs
                    .iter()
                    .flat_map(|input| words.iter().map(move |word| (word, window_similarity(input, word))))
                    .fold(None, |best: Option<(&String, f64)>, (word, score)| match best {
                        Some((_, best_score)) if best_score >= score => best,
                        _ => Some((word, score)),
                    })?;
                (similarity > FUZZY_THRESHOLD).then(|| Scored {
                    app,
                    confidence: similarity * FUZZY_SCALE,
                    reason: MatchReason::Fuzzy {
                        term: term.clone(),
                        similarity,
                    },
                })
            })
            .collect();

        scored.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        scored
    }

    fn candidate(&self, scored: Scored) -> MatchCandidate<'_> {
        let application = &self.applications[scored.app];
        MatchCandidate {
            id: &application.id,
            application,
            confidence: scored.confidence,
            reason: scored.reason,
        }
    }
}
