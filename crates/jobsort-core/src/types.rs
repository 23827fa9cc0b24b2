//! Core types for jobsort

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Sentinel label used when no category can be selected
pub const UNCLASSIFIED: &str = "Unclassified";

/// Contract type of a job offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Internship
    Stage,
    /// Apprenticeship (work-study)
    Alternance,
    /// No contract keyword found
    Unclassified,
}

impl ContractType {
    /// Label as it appears in the contract keyword table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stage => "Stage",
            Self::Alternance => "Alternance",
            Self::Unclassified => UNCLASSIFIED,
        }
    }

    /// Parse a classifier label, anything unknown is `Unclassified`
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::Unclassified)
    }

    /// The other contract type, used when a reviewer overrides the result.
    ///
    /// `Unclassified` flips to `Stage`, matching the reviewer's first choice.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Stage => Self::Alternance,
            Self::Alternance | Self::Unclassified => Self::Stage,
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stage" => Ok(Self::Stage),
            "alternance" => Ok(Self::Alternance),
            "unclassified" => Ok(Self::Unclassified),
            other => Err(format!("unknown contract type: {}", other)),
        }
    }
}

/// Score of a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Category name
    pub category: String,

    /// Keyword count (exact match) or cosine similarity (TF-IDF)
    pub score: f32,
}

impl CategoryScore {
    /// Create a new category score
    pub fn new(category: impl Into<String>, score: f32) -> Self {
        Self {
            category: category.into(),
            score,
        }
    }
}

/// Final classification of one job-offer document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Document that was classified
    pub source: PathBuf,

    /// Contract type from exact keyword matching
    pub contract_type: ContractType,

    /// Highest-scoring major, or [`UNCLASSIFIED`]
    pub top_category: String,

    /// Next-ranked majors
    pub alternate_categories: Vec<String>,

    /// Every major with its similarity, highest first
    pub category_scores: Vec<CategoryScore>,

    /// Keywords found in the document for the top majors
    pub matched_keywords: BTreeMap<String, Vec<String>>,

    /// When the document was processed
    pub processed_at: DateTime<Utc>,

    /// Failure that produced a sentinel result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassificationResult {
    /// Sentinel result for a document that could not be classified
    pub fn unclassified(source: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            contract_type: ContractType::Unclassified,
            top_category: UNCLASSIFIED.to_string(),
            alternate_categories: Vec::new(),
            category_scores: Vec::new(),
            matched_keywords: BTreeMap::new(),
            processed_at: Utc::now(),
            error: Some(error.into()),
        }
    }

    /// Whether classification failed and this is the sentinel
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Whether a major was selected
    pub fn is_classified(&self) -> bool {
        self.top_category != UNCLASSIFIED
    }

    /// Score of a category, if it was scored
    pub fn score_of(&self, category: &str) -> Option<f32> {
        self.category_scores
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.score)
    }

    /// File name of the source document
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// One line of a batch summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// File name within the batch directory
    pub file: String,

    /// Highest-scoring major
    pub top_category: String,

    /// The three best majors with their scores
    pub top_3_scores: Vec<CategoryScore>,
}

/// A document the batch could not process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    /// File name within the batch directory
    pub file: String,

    /// Error text
    pub error: String,
}

/// Outcome of classifying every PDF in a directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Directory that was processed
    pub directory: PathBuf,

    /// Successfully classified documents, in processing order
    pub entries: Vec<BatchEntry>,

    /// Documents that failed
    pub failures: Vec<BatchFailure>,

    /// Entries whose top category contains the directory name
    pub directory_matches: usize,
}

impl BatchReport {
    /// Number of documents attempted
    pub fn processed(&self) -> usize {
        self.entries.len() + self.failures.len()
    }
}
