//! Document classification pipeline
//!
//! Ties extraction, normalization and the two classifiers together:
//! - contract type by exact keyword counting over the fixed contract table
//! - major by TF-IDF similarity over the loaded keyword table
//!
//! Errors never escape a single-document call: they are logged and turned
//! into an `Unclassified` result carrying the error text.

use crate::classifier::{CategoryOutcome, Classifier, Strategy};
use crate::config::PipelineConfig;
use crate::keywords::KeywordTable;
use crate::normalizer::Normalizer;
use crate::resources::{ensure_resources, LinguisticResources};
use jobsort_core::{
    BatchEntry, BatchFailure, BatchReport, ClassificationResult, ContractType, Error, Result,
    UNCLASSIFIED,
};
use jobsort_extract::{PdfExtractor, TextExtractor};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// End-to-end classifier for job-offer PDFs
pub struct ClassificationPipeline {
    extractor: Box<dyn TextExtractor>,
    normalizer: Normalizer,
    contract_classifier: Box<dyn Classifier>,
    major_classifier: Box<dyn Classifier>,
    majors: Vec<String>,
    alternates: usize,
}

impl ClassificationPipeline {
    /// Assemble a pipeline from its parts
    pub fn new(
        extractor: Box<dyn TextExtractor>,
        normalizer: Normalizer,
        contract_classifier: Box<dyn Classifier>,
        major_classifier: Box<dyn Classifier>,
        alternates: usize,
    ) -> Self {
        Self {
            extractor,
            normalizer,
            contract_classifier,
            major_classifier,
            majors: Vec::new(),
            alternates,
        }
    }

    /// Build everything from configuration: linguistic resources (downloaded
    /// if missing), PDF extractor and keyword table
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let store = ensure_resources(&config.resources, config.lemmatizer)?;
        let normalizer = LinguisticResources::load(&store, config.lemmatizer)?.into_normalizer()?;
        let extractor = PdfExtractor::from_config(&config.ocr)?;
        Self::with_extractor(config, Box::new(extractor), normalizer)
    }

    /// Build with a given extractor and normalizer, loading the keyword table.
    ///
    /// An unreadable keyword source is logged and replaced by an empty table,
    /// so every document comes out unclassified.
    pub fn with_extractor(
        config: &PipelineConfig,
        extractor: Box<dyn TextExtractor>,
        normalizer: Normalizer,
    ) -> Result<Self> {
        let majors = match KeywordTable::load(&config.keywords_path, &normalizer) {
            Ok(table) => table,
            Err(e) => {
                error!("Keyword table unavailable, every major will be Unclassified: {}", e);
                KeywordTable::default()
            }
        };
        Self::from_tables(config, extractor, normalizer, &majors)
    }

    /// Build with an explicit major table
    pub fn from_tables(
        config: &PipelineConfig,
        extractor: Box<dyn TextExtractor>,
        normalizer: Normalizer,
        majors: &KeywordTable,
    ) -> Result<Self> {
        let contract_classifier =
            Strategy::ExactMatch.build("contract_type", &KeywordTable::contract_types(), config)?;
        let major_classifier = Strategy::tfidf(config).build("major", majors, config)?;

        info!(
            "Pipeline ready: {} majors, lemmatizer {}, match policy {:?}",
            majors.len(),
            normalizer.lemmatizer_name(),
            config.match_policy
        );

        Ok(Self::new(
            extractor,
            normalizer,
            contract_classifier,
            major_classifier,
            config.alternates,
        )
        .with_majors(majors.categories()))
    }

    /// Set the major names a reviewer may pick from
    pub fn with_majors<S: Into<String>>(mut self, majors: impl IntoIterator<Item = S>) -> Self {
        self.majors = majors.into_iter().map(Into::into).collect();
        self
    }

    /// Normalizer shared by documents and keywords
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Every major of the keyword table, in table order
    pub fn majors(&self) -> &[String] {
        &self.majors
    }

    /// Table spelling of a reviewer-chosen major, matched case-insensitively
    pub fn resolve_major(&self, name: &str) -> Result<&str> {
        let wanted = name.trim().to_lowercase();
        self.majors
            .iter()
            .find(|major| major.to_lowercase() == wanted)
            .map(String::as_str)
            .ok_or_else(|| Error::config(format!("Unknown major {:?}", name)))
    }

    /// Classify one PDF. Never fails: errors yield the `Unclassified` sentinel.
    pub fn classify(&self, path: &Path) -> ClassificationResult {
        match self.try_classify(path) {
            Ok(result) => {
                metrics::counter!("jobsort_documents_total", "outcome" => "classified").increment(1);
                result
            }
            Err(e) => {
                error!("Failed to classify {}: {}", path.display(), e);
                metrics::counter!("jobsort_documents_total", "outcome" => "failed").increment(1);
                ClassificationResult::unclassified(path, e.to_string())
            }
        }
    }

    fn try_classify(&self, path: &Path) -> Result<ClassificationResult> {
        if !path.is_file() {
            return Err(Error::extraction(format!("{} is not a file", path.display())));
        }

        let text = self.extractor.extract_text(path);
        if text.trim().is_empty() {
            warn!("No text extracted from {}", path.display());
        }
        self.classify_text(path, &text)
    }

    /// Classify already extracted text on behalf of `source`
    pub fn classify_text(&self, source: impl Into<PathBuf>, text: &str) -> Result<ClassificationResult> {
        let source = source.into();
        let doc = self.normalizer.normalize(text);
        debug!("{}: {} normalized tokens", source.display(), doc.len());

        let contract = self.contract_classifier.classify(&doc)?;
        let majors = self.major_classifier.classify(&doc)?;

        let contract_type = ContractType::from_label(contract.best());
        info!(
            "{}: contract {} (keywords {:?}), major {}",
            source.display(),
            contract_type,
            contract.matched_keywords,
            majors.best()
        );

        Ok(self.assemble(source, contract_type, majors))
    }

    fn assemble(
        &self,
        source: PathBuf,
        contract_type: ContractType,
        majors: CategoryOutcome,
    ) -> ClassificationResult {
        let top_category = majors.best().to_string();
        let alternate_categories = if top_category == UNCLASSIFIED {
            Vec::new()
        } else {
            majors.alternates(self.alternates)
        };

        ClassificationResult {
            source,
            contract_type,
            top_category,
            alternate_categories,
            category_scores: majors.ranked,
            matched_keywords: majors.matched_keywords,
            processed_at: chrono::Utc::now(),
            error: None,
        }
    }

    /// Classify uploaded bytes by staging them in a temporary file
    pub fn classify_bytes(&self, file_name: &str, bytes: &[u8]) -> ClassificationResult {
        let name = Path::new(file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "upload.pdf".into());

        let staged = tempfile::tempdir().map_err(Error::from).and_then(|dir| {
            let path = dir.path().join(&name);
            std::fs::write(&path, bytes)?;
            Ok((dir, path))
        });

        match staged {
            Ok((_dir, path)) => {
                let mut result = self.classify(&path);
                result.source = PathBuf::from(file_name);
                result
            }
            Err(e) => {
                error!("Failed to stage upload {}: {}", file_name, e);
                ClassificationResult::unclassified(file_name, e.to_string())
            }
        }
    }

    /// Classify every PDF of a directory, in file name order.
    ///
    /// Offers are expected to be sorted into folders named after their major,
    /// optionally prefixed (`03-Informatique`); each top category is checked
    /// against that name.
    pub fn classify_directory(&self, dir: &Path) -> Result<BatchReport> {
        let files = pdf_files(dir)?;
        let target = directory_target(dir);
        info!("Classifying {} PDFs in {} (expected major {:?})", files.len(), dir.display(), target);

        let mut report = BatchReport {
            directory: dir.to_path_buf(),
            ..Default::default()
        };

        for path in files {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let result = self.classify(&path);
            if let Some(err) = result.error {
                error!("Error processing {}: {}", file, err);
                report.failures.push(BatchFailure { file, error: err });
                continue;
            }

            let matches = target.as_ref().is_some_and(|t| {
                result.top_category.to_lowercase().contains(&t.to_lowercase())
            });
            if matches {
                report.directory_matches += 1;
            }
            info!(
                "{}: contract {}, major {}, matched keywords {:?}, consistent with directory: {}",
                file, result.contract_type, result.top_category, result.matched_keywords, matches
            );

            report.entries.push(BatchEntry {
                file,
                top_category: result.top_category,
                top_3_scores: result.category_scores.into_iter().take(3).collect(),
            });
        }

        info!(
            "Batch done: {} classified, {} failed, {} consistent with {:?}",
            report.entries.len(),
            report.failures.len(),
            report.directory_matches,
            target
        );
        Ok(report)
    }
}

/// `*.pdf` files of `dir` (any extension case), sorted by path
fn pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::extraction(format!("Cannot read directory {}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Major a directory is named after: the trimmed segment after the first
/// `-` when there is one, otherwise the whole name. `None` when that is empty.
fn directory_target(dir: &Path) -> Option<String> {
    let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    let name = resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let segment = match name.split_once('-') {
        Some((_, rest)) => rest.split('-').next().unwrap_or_default(),
        None => name.as_str(),
    };
    let target = segment.trim();
    (!target.is_empty()).then(|| target.to_string())
}
