//! Text normalization shared by the index builder and the query path

use regex::Regex;
use std::sync::LazyLock;

use crate::error::MatcherResult;

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]").unwrap());

/// Lower-case, strip punctuation, collapse whitespace.
///
/// `"  GitLab  CE!"` → `"gitlab ce"`, `"SAP S/4HANA"` → `"sap s4hana"`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Words of a normalized string longer than two characters
pub fn significant_words(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split(' ')
        .filter(|word| word.chars().count() > 2)
}

/// Whole-word or whole-phrase containment on normalized text
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    format!(" {} ", normalized).contains(&format!(" {} ", phrase))
}

/// Split an id or name into comparable words (`sap-s4hana` → `sap`, `s4hana`)
pub fn split_identifier(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '.'))
        .map(normalize)
        .filter(|word| !word.is_empty())
        .collect()
}

/// Removes size qualifiers ("klein", "large", ...) from free text
#[derive(Debug, Clone)]
pub struct QualifierStripper {
    pattern: Option<Regex>,
}

impl QualifierStripper {
    pub fn new<S: AsRef<str>>(qualifiers: &[S]) -> MatcherResult<Self> {
        let alternatives: Vec<String> = qualifiers
            .iter()
            .map(|q| q.as_ref().trim())
            .filter(|q| !q.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Strip qualifiers, then normalize
    pub fn strip(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => normalize(&pattern.replace_all(text, " ")),
            None => normalize(text),
        }
    }
}
