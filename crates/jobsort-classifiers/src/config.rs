//! Pipeline configuration

use crate::lemmatizer::LemmatizerKind;
use crate::matcher::MatchPolicy;
use crate::resources::ResourceConfig;
use jobsort_core::{Error, Result};
use jobsort_extract::OcrConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for the whole classification pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// CSV keyword source (`Major`, `Keyword` columns)
    #[serde(default = "default_keywords_path")]
    pub keywords_path: PathBuf,

    /// How keywords are matched against document text
    #[serde(default)]
    pub match_policy: MatchPolicy,

    /// Lemmatizer used for documents and keywords
    #[serde(default)]
    pub lemmatizer: LemmatizerKind,

    /// Number of alternate majors reported after the top one
    #[serde(default = "default_alternates")]
    pub alternates: usize,

    /// TF-IDF vectorizer and selection settings
    #[serde(default)]
    pub tfidf: TfIdfConfig,

    /// OCR fallback settings
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Linguistic data location
    #[serde(default)]
    pub resources: ResourceConfig,
}

/// TF-IDF settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TfIdfConfig {
    /// Minimum number of corpus documents a term must appear in
    #[serde(default = "default_min_df")]
    pub min_df: usize,

    /// Smallest n-gram size
    #[serde(default = "default_ngram_min")]
    pub ngram_min: usize,

    /// Largest n-gram size
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,

    /// Vocabulary cap, most frequent terms kept
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Categories within this distance of the best score are all selected
    #[serde(default)]
    pub interval: f32,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self {
            min_df: default_min_df(),
            ngram_min: default_ngram_min(),
            ngram_max: default_ngram_max(),
            max_features: default_max_features(),
            interval: 0.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            keywords_path: default_keywords_path(),
            match_policy: MatchPolicy::default(),
            lemmatizer: LemmatizerKind::default(),
            alternates: default_alternates(),
            tfidf: TfIdfConfig::default(),
            ocr: OcrConfig::default(),
            resources: ResourceConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Load from file, falling back to defaults when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            Self::from_file(path)
        } else {
            info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Reject settings the vectorizer cannot run with
    pub fn validate(&self) -> Result<()> {
        let tfidf = &self.tfidf;
        if tfidf.ngram_min == 0 {
            return Err(Error::config("tfidf.ngram_min must be at least 1"));
        }
        if tfidf.ngram_min > tfidf.ngram_max {
            return Err(Error::config(format!(
                "tfidf.ngram_min ({}) is greater than tfidf.ngram_max ({})",
                tfidf.ngram_min, tfidf.ngram_max
            )));
        }
        if tfidf.max_features == 0 {
            return Err(Error::config("tfidf.max_features must be at least 1"));
        }
        if tfidf.interval.is_nan() || tfidf.interval < 0.0 {
            return Err(Error::config("tfidf.interval must be a non-negative number"));
        }
        Ok(())
    }
}

fn default_keywords_path() -> PathBuf {
    PathBuf::from("majors_keywords.csv")
}

fn default_alternates() -> usize {
    2
}

fn default_min_df() -> usize {
    2
}

fn default_ngram_min() -> usize {
    1
}

fn default_ngram_max() -> usize {
    3
}

fn default_max_features() -> usize {
    500
}
