//! Copy classified offers into a contract/degree/major directory tree
//!
//! A major such as `Master Génie Civil` is filed under
//! `ROOT/STAGE/MASTER/GÉNIE_CIVIL/`, and `Ingénieur Master Finance` under
//! `ROOT/ALTERNANCE/INGÉNIEUR/MASTER/FINANCE/`. Majors naming no degree are
//! not filed.

use jobsort_core::{ClassificationResult, ContractType};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Degree words a major name is split on
pub const DEGREE_KEYWORDS: &[&str] = &["MASTER", "BACHELOR", "MASTÈRE", "MBA"];

/// Result of filing one document
#[derive(Debug, Default)]
pub struct FilingOutcome {
    /// Files written
    pub copied: Vec<PathBuf>,

    /// Destinations that could not be written, with the error
    pub failed: Vec<(PathBuf, String)>,

    /// Classifications without any degree keyword
    pub skipped: Vec<String>,
}

/// Destination directories for one classification, one per degree keyword it contains
pub fn destinations(root: &Path, contract: ContractType, classification: &str) -> Vec<PathBuf> {
    let parts: Vec<String> = classification
        .to_uppercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    DEGREE_KEYWORDS
        .iter()
        .filter_map(|keyword| {
            let index = parts.iter().position(|p| p == keyword)?;
            let mut dir = root.join(contract.as_str().to_uppercase());
            for part in &parts[..=index] {
                dir.push(part);
            }
            let rest = parts[index + 1..].join("_");
            if !rest.is_empty() {
                dir.push(rest);
            }
            Some(dir)
        })
        .collect()
}

/// Majors a document is filed under.
///
/// Reviewer-chosen majors replace the detected one. Otherwise the top
/// category is used, followed by the alternates when requested. Failed
/// results are never filed, and neither are unclassified ones unless a
/// reviewer picked the majors.
pub fn filing_majors(
    result: &ClassificationResult,
    chosen: &[String],
    with_alternates: bool,
) -> Vec<String> {
    if result.is_failure() {
        return Vec::new();
    }
    if !chosen.is_empty() {
        return chosen.to_vec();
    }
    if !result.is_classified() {
        return Vec::new();
    }

    let mut majors = vec![result.top_category.clone()];
    if with_alternates {
        majors.extend(result.alternate_categories.iter().cloned());
    }
    majors
}

/// Copy `source` into the directory of every classification
pub fn file_document(
    source: &Path,
    root: &Path,
    contract: ContractType,
    classifications: &[String],
) -> FilingOutcome {
    let mut outcome = FilingOutcome::default();
    let Some(file_name) = source.file_name() else {
        outcome
            .failed
            .push((source.to_path_buf(), "source has no file name".to_string()));
        return outcome;
    };

    for classification in classifications {
        let dirs = destinations(root, contract, classification);
        if dirs.is_empty() {
            outcome.skipped.push(classification.clone());
            continue;
        }

        for dir in dirs {
            let target = dir.join(file_name);
            match std::fs::create_dir_all(&dir).and_then(|_| std::fs::copy(source, &target)) {
                Ok(_) => {
                    info!("Copied {} to {}", source.display(), target.display());
                    outcome.copied.push(target);
                }
                Err(e) => {
                    warn!("Failed to copy {} to {}: {}", source.display(), target.display(), e);
                    outcome.failed.push((target, e.to_string()));
                }
            }
        }
    }

    outcome
}
