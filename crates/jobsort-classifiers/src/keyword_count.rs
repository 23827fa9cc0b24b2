//! Exact keyword counting

use crate::classifier::{CategoryOutcome, Classifier, Strategy};
use crate::keywords::KeywordTable;
use crate::matcher::{MatchPolicy, PhraseMatcher};
use crate::normalizer::NormalizedDocument;
use jobsort_core::{CategoryScore, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Scores each category by the number of its distinct keywords found in the
/// document.
///
/// The highest count wins and ties go to the earlier category. A document
/// matching no keyword at all is unclassified.
pub struct KeywordCountClassifier {
    name: String,
    categories: Vec<(String, PhraseMatcher)>,
}

impl KeywordCountClassifier {
    /// Create a classifier over every category of `table`
    pub fn new(name: impl Into<String>, table: &KeywordTable, policy: MatchPolicy) -> Result<Self> {
        let categories = table
            .iter()
            .map(|(category, keywords)| {
                Ok((category.to_string(), PhraseMatcher::new(keywords, policy)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.into(),
            categories,
        })
    }
}

impl Classifier for KeywordCountClassifier {
    fn classify(&self, doc: &NormalizedDocument) -> Result<CategoryOutcome> {
        let text = doc.text();
        let mut scores = Vec::with_capacity(self.categories.len());
        let mut matched_keywords = BTreeMap::new();
        let mut best: Option<(usize, &str)> = None;

        for (category, matcher) in &self.categories {
            let found: Vec<String> = matcher.find(text).into_iter().map(str::to_string).collect();
            let count = found.len();
            if count > 0 && best.map_or(true, |(c, _)| count > c) {
                best = Some((count, category));
            }
            scores.push(CategoryScore::new(category.as_str(), count as f32));
            matched_keywords.insert(category.clone(), found);
        }

        debug!(classifier = %self.name, ?scores, "Keyword counts");

        let top = best.map(|(_, c)| vec![c.to_string()]).unwrap_or_default();
        Ok(CategoryOutcome::new(top, scores, matched_keywords))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn strategy(&self) -> Strategy {
        Strategy::ExactMatch
    }
}
