//! jobsort Classifiers
//!
//! Keyword-driven classification of job offers.
//!
//! Text goes through a French-aware [`Normalizer`] and is then scored by two
//! strategies sharing the [`Classifier`] trait:
//! - Exact match: distinct keyword counts per category, used for the contract
//!   type (`Stage` / `Alternance`)
//! - TF-IDF: cosine similarity between the document and each category's
//!   keywords, used for the academic major
//!
//! [`ClassificationPipeline`] wires extraction, normalization and both
//! classifiers for single files, uploads and whole directories.

pub mod classifier;
pub mod config;
pub mod keyword_count;
pub mod keywords;
pub mod lemmatizer;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod resources;
pub mod similarity;
pub mod tfidf;

pub use classifier::{CategoryOutcome, Classifier, Strategy};
pub use config::{PipelineConfig, TfIdfConfig};
pub use keyword_count::KeywordCountClassifier;
pub use keywords::KeywordTable;
pub use lemmatizer::{
    FrenchPluralLemmatizer, IdentityLemmatizer, Lemmatizer, LemmatizerKind, WordNetLemmatizer,
};
pub use matcher::{MatchPolicy, PhraseMatcher};
pub use normalizer::{strip_diacritics, FrenchTokenizer, NormalizedDocument, Normalizer, Stopwords};
pub use pipeline::ClassificationPipeline;
pub use resources::{
    ensure_resources, ensure_resources_with, Bundle, BundleFetcher, HttpFetcher,
    LinguisticResources, ResourceConfig, ResourceStore,
};
pub use tfidf::{TfIdfClassifier, TfIdfMatrix, TfIdfVectorizer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{CategoryOutcome, Classifier, Strategy};
    pub use crate::config::PipelineConfig;
    pub use crate::keywords::KeywordTable;
    pub use crate::normalizer::{NormalizedDocument, Normalizer};
    pub use crate::pipeline::ClassificationPipeline;
}
