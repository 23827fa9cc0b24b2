//! TF-IDF vectorization and similarity-based classification
//!
//! The vectorizer follows the usual smoothed TF-IDF recipe: lowercase, word
//! tokens of two or more characters, n-grams over those tokens, document
//! frequency pruning, a vocabulary capped to the most frequent terms, smoothed
//! idf `ln((1 + n) / (1 + df)) + 1` and L2-normalized rows.
//!
//! The classifier fits a fresh vectorizer per document on a corpus made of
//! one pseudo-document per category (its keywords) plus the document itself,
//! then ranks categories by cosine similarity to the document.

use crate::classifier::{CategoryOutcome, Classifier, Strategy};
use crate::config::TfIdfConfig;
use crate::keywords::KeywordTable;
use crate::matcher::{MatchPolicy, PhraseMatcher};
use crate::normalizer::NormalizedDocument;
use crate::similarity::{cosine_similarity, l2_normalize};
use jobsort_core::{CategoryScore, Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// TF-IDF vectorizer settings and tokenizer
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    min_df: usize,
    ngram_range: (usize, usize),
    max_features: usize,
    token_pattern: Regex,
}

/// Dense TF-IDF rows over a shared vocabulary
#[derive(Debug, Clone, Default)]
pub struct TfIdfMatrix {
    vocabulary: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TfIdfMatrix {
    /// Terms in column order (sorted)
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Row of one corpus document
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix has no row
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TfIdfVectorizer {
    /// Create a vectorizer
    pub fn new(min_df: usize, ngram_range: (usize, usize), max_features: usize) -> Result<Self> {
        let (ngram_min, ngram_max) = ngram_range;
        if ngram_min == 0 || ngram_min > ngram_max {
            return Err(Error::config(format!(
                "Invalid n-gram range ({}, {})",
                ngram_min, ngram_max
            )));
        }

        Ok(Self {
            min_df,
            ngram_range,
            max_features,
            token_pattern: Regex::new(r"\b\w\w+\b")
                .map_err(|e| Error::config(format!("Failed to compile token pattern: {}", e)))?,
        })
    }

    /// Create a vectorizer from configuration
    pub fn from_config(config: &TfIdfConfig) -> Result<Self> {
        Self::new(
            config.min_df,
            (config.ngram_min, config.ngram_max),
            config.max_features,
        )
    }

    /// Every n-gram of `text`, with repetition
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = self.token_pattern.find_iter(&lower).map(|m| m.as_str()).collect();
        let (ngram_min, ngram_max) = self.ngram_range;

        let mut terms = Vec::new();
        for n in ngram_min..=ngram_max.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Learn the vocabulary and idf of `corpus` and return its TF-IDF rows.
    ///
    /// An empty vocabulary, before or after pruning, yields all-zero rows.
    pub fn fit_transform<S: AsRef<str>>(&self, corpus: &[S]) -> TfIdfMatrix {
        let counts: Vec<HashMap<String, usize>> = corpus
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for term in self.analyze(doc.as_ref()) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        // term -> (document frequency, total count)
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for doc in &counts {
            for (term, count) in doc {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += count;
            }
        }

        let mut kept: Vec<(&str, usize, usize)> = stats
            .into_iter()
            .filter(|(_, (df, _))| *df >= self.min_df)
            .map(|(term, (df, tf))| (term, df, tf))
            .collect();

        if kept.len() > self.max_features {
            // Highest total counts first, ties in vocabulary order
            let mut by_frequency: Vec<usize> = (0..kept.len()).collect();
            by_frequency.sort_by(|a, b| kept[*b].2.cmp(&kept[*a].2));
            let mut selected: Vec<usize> = by_frequency.into_iter().take(self.max_features).collect();
            selected.sort_unstable();
            kept = selected.into_iter().map(|i| kept[i]).collect();
        }

        let n_docs = corpus.len() as f64;
        let idf: Vec<f64> = kept
            .iter()
            .map(|(_, df, _)| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .iter()
            .map(|doc| {
                let mut row: Vec<f64> = kept
                    .iter()
                    .zip(&idf)
                    .map(|((term, _, _), idf)| doc.get(*term).copied().unwrap_or(0) as f64 * idf)
                    .collect();
                l2_normalize(&mut row);
                row
            })
            .collect();

        TfIdfMatrix {
            vocabulary: kept.iter().map(|(term, _, _)| term.to_string()).collect(),
            rows,
        }
    }
}

/// Classifies a document by TF-IDF cosine similarity to each category's
/// keywords.
///
/// Every category within `interval` of the best similarity is selected. When
/// nothing is similar at all, every category ties at zero and all are
/// selected.
pub struct TfIdfClassifier {
    name: String,
    categories: Vec<TfIdfCategory>,
    vectorizer: TfIdfVectorizer,
    interval: f32,
}

struct TfIdfCategory {
    name: String,
    keywords_text: String,
    matcher: PhraseMatcher,
}

impl TfIdfClassifier {
    /// Create a classifier over every category of `table`
    pub fn new(
        name: impl Into<String>,
        table: &KeywordTable,
        vectorizer: TfIdfVectorizer,
        policy: MatchPolicy,
        interval: f32,
    ) -> Result<Self> {
        let categories = table
            .iter()
            .map(|(category, keywords)| {
                Ok(TfIdfCategory {
                    name: category.to_string(),
                    keywords_text: keywords.join(" "),
                    matcher: PhraseMatcher::new(keywords, policy)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.into(),
            categories,
            vectorizer,
            interval,
        })
    }

    /// Similarity of the document to every category, in table order
    pub fn similarities(&self, doc: &NormalizedDocument) -> Vec<f64> {
        let mut corpus: Vec<&str> = self.categories.iter().map(|c| c.keywords_text.as_str()).collect();
        corpus.push(doc.text());

        let matrix = self.vectorizer.fit_transform(&corpus);
        debug!(
            classifier = %self.name,
            vocabulary = matrix.vocabulary().len(),
            "Fitted TF-IDF vocabulary"
        );

        let Some(doc_row) = matrix.row(self.categories.len()) else {
            return vec![0.0; self.categories.len()];
        };
        (0..self.categories.len())
            .map(|i| {
                matrix
                    .row(i)
                    .map(|row| cosine_similarity(row, doc_row).max(0.0))
                    .unwrap_or(0.0)
            })
            .collect()
    }
}

impl Classifier for TfIdfClassifier {
    fn classify(&self, doc: &NormalizedDocument) -> Result<CategoryOutcome> {
        if self.categories.is_empty() {
            return Ok(CategoryOutcome::default());
        }

        let similarities = self.similarities(doc);
        let best = similarities.iter().copied().fold(0.0_f64, f64::max);
        let interval = f64::from(self.interval);

        let mut top = Vec::new();
        let mut matched_keywords = BTreeMap::new();
        for (category, similarity) in self.categories.iter().zip(&similarities) {
            if best - similarity > interval {
                continue;
            }
            top.push(category.name.clone());
            let found: Vec<String> = category
                .matcher
                .find(doc.text())
                .into_iter()
                .map(str::to_string)
                .collect();
            if !found.is_empty() {
                matched_keywords.insert(category.name.clone(), found);
            }
        }

        let scores: Vec<CategoryScore> = self
            .categories
            .iter()
            .zip(&similarities)
            .map(|(c, s)| CategoryScore::new(c.name.as_str(), *s as f32))
            .collect();

        debug!(classifier = %self.name, ?top, "TF-IDF selection");
        Ok(CategoryOutcome::new(top, scores, matched_keywords))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn strategy(&self) -> Strategy {
        Strategy::TfIdf {
            interval: self.interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer(min_df: usize, ngram: (usize, usize), max_features: usize) -> TfIdfVectorizer {
        TfIdfVectorizer::new(min_df, ngram, max_features).unwrap()
    }

    fn majors() -> KeywordTable {
        KeywordTable::new([
            ("Informatique", vec!["developpeur", "logiciel", "programmation"]),
            ("Droit", vec!["avocat", "juridique", "contrat"]),
        ])
    }

    fn classifier(table: &KeywordTable, interval: f32) -> TfIdfClassifier {
        TfIdfClassifier::new(
            "major",
            table,
            TfIdfVectorizer::from_config(&TfIdfConfig::default()).unwrap(),
            MatchPolicy::Substring,
            interval,
        )
        .unwrap()
    }

    fn doc(text: &str) -> NormalizedDocument {
        NormalizedDocument::from_tokens(text.split_whitespace().map(str::to_string).collect())
    }

    #[test]
    fn test_analyze_ngrams() {
        let v = vectorizer(1, (1, 2), 10);
        assert_eq!(
            v.analyze("Genie civil a BTP"),
            vec!["genie", "civil", "btp", "genie civil", "civil btp"]
        );
        assert!(v.analyze("").is_empty());
    }

    #[test]
    fn test_smoothed_idf_and_l2_rows() {
        let matrix = vectorizer(1, (1, 1), 10).fit_transform(&["stage", "stage alternance"]);
        assert_eq!(matrix.vocabulary(), &["alternance".to_string(), "stage".to_string()]);

        let row = matrix.row(0).unwrap();
        assert_eq!(row, &[0.0, 1.0]);

        let row = matrix.row(1).unwrap();
        assert!((row[0] - 0.814802).abs() < 1e-5);
        assert!((row[1] - 0.579739).abs() < 1e-5);
    }

    #[test]
    fn test_min_df_prunes_rare_terms() {
        let matrix = vectorizer(2, (1, 1), 10).fit_transform(&["stage logiciel", "stage avocat"]);
        assert_eq!(matrix.vocabulary(), &["stage".to_string()]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let matrix = vectorizer(1, (1, 1), 1).fit_transform(&["stage stage alternance", "stage"]);
        assert_eq!(matrix.vocabulary(), &["stage".to_string()]);

        // Equal counts fall back to vocabulary order
        let matrix = vectorizer(1, (1, 1), 1).fit_transform(&["stage alternance", "alternance stage"]);
        assert_eq!(matrix.vocabulary(), &["alternance".to_string()]);
    }

    #[test]
    fn test_empty_vocabulary_gives_zero_rows() {
        let matrix = vectorizer(2, (1, 3), 500).fit_transform(&["a b", "c"]);
        assert!(matrix.vocabulary().is_empty());
        assert_eq!(matrix.len(), 2);
        assert!(matrix.row(0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_ngram_range() {
        assert!(TfIdfVectorizer::new(2, (0, 3), 500).is_err());
        assert!(TfIdfVectorizer::new(2, (3, 1), 500).is_err());
    }

    #[test]
    fn test_unique_best_category() {
        let outcome = classifier(&majors(), 0.0)
            .classify(&doc("developpeur logiciel java"))
            .unwrap();

        assert_eq!(outcome.top, vec!["Informatique"]);
        assert!(outcome.score_of("Informatique").unwrap() > 0.99);
        assert_eq!(outcome.score_of("Droit"), Some(0.0));
        assert_eq!(outcome.matched_keywords.len(), 1);
        assert_eq!(outcome.matched_keywords["Informatique"], vec!["developpeur", "logiciel"]);
        for score in &outcome.ranked {
            assert!((0.0..=1.0).contains(&score.score));
        }
    }

    #[test]
    fn test_ties_select_every_category() {
        let outcome = classifier(&majors(), 0.0).classify(&doc("avocat developpeur")).unwrap();
        assert_eq!(outcome.top, vec!["Informatique", "Droit"]);
        assert_eq!(outcome.ranked[0].category, "Informatique");
        assert_eq!(outcome.matched_keywords["Droit"], vec!["avocat"]);
    }

    #[test]
    fn test_interval_widens_selection() {
        let text = doc("developpeur logiciel avocat");

        let outcome = classifier(&majors(), 0.0).classify(&text).unwrap();
        assert_eq!(outcome.top, vec!["Informatique"]);
        assert!((outcome.score_of("Informatique").unwrap() - 0.8660).abs() < 1e-3);
        assert!((outcome.score_of("Droit").unwrap() - 0.5).abs() < 1e-3);
        assert!(!outcome.matched_keywords.contains_key("Droit"));

        let outcome = classifier(&majors(), 0.4).classify(&text).unwrap();
        assert_eq!(outcome.top, vec!["Informatique", "Droit"]);
        assert_eq!(outcome.matched_keywords["Droit"], vec!["avocat"]);
    }

    #[test]
    fn test_no_shared_terms_selects_all_at_zero() {
        let outcome = classifier(&majors(), 0.0).classify(&doc("java rust")).unwrap();
        assert_eq!(outcome.top.len(), 2);
        assert!(outcome.ranked.iter().all(|s| s.score == 0.0));
        assert!(outcome.matched_keywords.is_empty());
    }

    #[test]
    fn test_empty_table() {
        let outcome = classifier(&KeywordTable::default(), 0.0)
            .classify(&doc("developpeur"))
            .unwrap();
        assert!(outcome.is_unclassified());
        assert!(outcome.ranked.is_empty());
    }
}
