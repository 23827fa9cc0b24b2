//! Classifier trait and common types

use crate::config::PipelineConfig;
use crate::keyword_count::KeywordCountClassifier;
use crate::keywords::KeywordTable;
use crate::normalizer::NormalizedDocument;
use crate::tfidf::{TfIdfClassifier, TfIdfVectorizer};
use jobsort_core::{CategoryScore, Result, UNCLASSIFIED};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Trait for all category classifiers
pub trait Classifier: Send + Sync {
    /// Classify an already normalized document
    fn classify(&self, doc: &NormalizedDocument) -> Result<CategoryOutcome>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Get the scoring strategy
    fn strategy(&self) -> Strategy;
}

/// Result of scoring one document against a keyword table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryOutcome {
    /// Selected categories in table order; empty means unclassified
    pub top: Vec<String>,

    /// Every category with its score, highest first, ties in table order
    pub ranked: Vec<CategoryScore>,

    /// Matched keywords per category
    pub matched_keywords: BTreeMap<String, Vec<String>>,
}

impl CategoryOutcome {
    /// Build an outcome, ranking `scores` (given in table order)
    pub fn new(
        top: Vec<String>,
        scores: Vec<CategoryScore>,
        matched_keywords: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            top,
            ranked: rank(scores),
            matched_keywords,
        }
    }

    /// Whether no category was selected
    pub fn is_unclassified(&self) -> bool {
        self.top.is_empty()
    }

    /// Highest-ranked category, or [`UNCLASSIFIED`] when nothing was selected
    pub fn best(&self) -> &str {
        if self.top.is_empty() {
            return UNCLASSIFIED;
        }
        self.ranked
            .first()
            .map(|s| s.category.as_str())
            .unwrap_or(&self.top[0])
    }

    /// Up to `n` categories ranked right after the best one
    pub fn alternates(&self, n: usize) -> Vec<String> {
        self.ranked
            .iter()
            .skip(1)
            .take(n)
            .map(|s| s.category.clone())
            .collect()
    }

    /// Score of one category
    pub fn score_of(&self, category: &str) -> Option<f32> {
        self.ranked
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.score)
    }
}

/// Stable sort by descending score
pub fn rank(mut scores: Vec<CategoryScore>) -> Vec<CategoryScore> {
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scores
}

/// Scoring strategy, chosen explicitly by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Count distinct matched keywords per category
    ExactMatch,
    /// Cosine similarity of TF-IDF vectors; categories within `interval` of
    /// the best score are all selected
    TfIdf { interval: f32 },
}

impl Strategy {
    /// TF-IDF with the configured interval
    pub fn tfidf(config: &PipelineConfig) -> Self {
        Self::TfIdf {
            interval: config.tfidf.interval,
        }
    }

    /// Short strategy name
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExactMatch => "exact_match",
            Self::TfIdf { .. } => "tfidf",
        }
    }

    /// Build a classifier over `table`
    pub fn build(
        self,
        name: impl Into<String>,
        table: &KeywordTable,
        config: &PipelineConfig,
    ) -> Result<Box<dyn Classifier>> {
        let classifier: Box<dyn Classifier> = match self {
            Self::ExactMatch => Box::new(KeywordCountClassifier::new(name, table, config.match_policy)?),
            Self::TfIdf { interval } => Box::new(TfIdfClassifier::new(
                name,
                table,
                TfIdfVectorizer::from_config(&config.tfidf)?,
                config.match_policy,
                interval,
            )?),
        };
        Ok(classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_is_stable() {
        let ranked = rank(vec![
            CategoryScore::new("Droit", 0.2),
            CategoryScore::new("Informatique", 0.5),
            CategoryScore::new("BTP", 0.2),
            CategoryScore::new("Commerce", 0.5),
        ]);
        let order: Vec<_> = ranked.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(order, vec!["Informatique", "Commerce", "Droit", "BTP"]);
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = CategoryOutcome::new(
            vec!["Informatique".to_string()],
            vec![
                CategoryScore::new("Droit", 0.1),
                CategoryScore::new("Informatique", 0.9),
                CategoryScore::new("BTP", 0.3),
                CategoryScore::new("Commerce", 0.0),
            ],
            BTreeMap::new(),
        );

        assert!(!outcome.is_unclassified());
        assert_eq!(outcome.best(), "Informatique");
        assert_eq!(outcome.alternates(2), vec!["BTP", "Droit"]);
        assert_eq!(outcome.score_of("Droit"), Some(0.1));
        assert_eq!(outcome.score_of("Chimie"), None);
    }

    #[test]
    fn test_empty_outcome_is_unclassified() {
        let outcome = CategoryOutcome::default();
        assert!(outcome.is_unclassified());
        assert_eq!(outcome.best(), UNCLASSIFIED);
        assert!(outcome.alternates(2).is_empty());
    }

    #[test]
    fn test_strategy_labels() {
        assert_eq!(Strategy::ExactMatch.label(), "exact_match");
        let config = PipelineConfig::default();
        assert_eq!(Strategy::tfidf(&config), Strategy::TfIdf { interval: 0.0 });
    }
}
