//! Keyword phrase matching using Aho-Corasick

use aho_corasick::AhoCorasick;
use jobsort_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a keyword must occur in normalized text to count as a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Anywhere in the text, including inside longer words (`apprenti` in `apprentissage`)
    #[default]
    Substring,
    /// Only as a whole sequence of tokens
    TokenBoundary,
}

/// Finds which keywords of a fixed list occur in a text.
///
/// All keywords are searched in one pass with overlapping matches, so both
/// `genie` and `genie civil` are reported for `genie civil`. Each keyword is
/// reported at most once.
pub struct PhraseMatcher {
    keywords: Vec<String>,
    automaton: AhoCorasick,
    policy: MatchPolicy,
}

impl PhraseMatcher {
    /// Build a matcher; keywords are lowercased, blanks and duplicates dropped
    pub fn new<S: AsRef<str>>(keywords: &[S], policy: MatchPolicy) -> Result<Self> {
        let mut seen = HashSet::new();
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();

        let patterns: Vec<String> = match policy {
            MatchPolicy::Substring => keywords.clone(),
            MatchPolicy::TokenBoundary => keywords.iter().map(|k| format!(" {} ", k)).collect(),
        };

        let automaton = AhoCorasick::new(&patterns)
            .map_err(|e| Error::classifier(format!("Failed to build keyword matcher: {}", e)))?;

        Ok(Self {
            keywords,
            automaton,
            policy,
        })
    }

    /// Keywords searched for, in matching order
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Matching policy
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Keywords present in `text`, in keyword-list order
    pub fn find(&self, text: &str) -> Vec<&str> {
        if self.keywords.is_empty() {
            return Vec::new();
        }

        let haystack = match self.policy {
            MatchPolicy::Substring => text.to_lowercase(),
            MatchPolicy::TokenBoundary => {
                format!(" {} ", text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
            }
        };

        let mut hit = vec![false; self.keywords.len()];
        for m in self.automaton.find_overlapping_iter(&haystack) {
            hit[m.pattern().as_usize()] = true;
        }

        self.keywords
            .iter()
            .zip(hit)
            .filter_map(|(keyword, hit)| hit.then_some(keyword.as_str()))
            .collect()
    }

    /// Number of distinct keywords present in `text`
    pub fn count(&self, text: &str) -> usize {
        self.find(text).len()
    }
}

impl std::fmt::Debug for PhraseMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseMatcher")
            .field("keywords", &self.keywords)
            .field("policy", &self.policy)
            .finish()
    }
}
