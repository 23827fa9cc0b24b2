//! Human-readable rendering of classification results

use jobsort_core::{BatchReport, ClassificationResult};
use std::fmt::Write;

/// Multi-line summary of one classification
pub fn render_result(result: &ClassificationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result.file_name());
    if let Some(err) = &result.error {
        let _ = writeln!(out, "  error:          {}", err);
    }
    let _ = writeln!(out, "  contract type:  {}", result.contract_type);
    let _ = writeln!(out, "  major:          {}", result.top_category);
    if !result.alternate_categories.is_empty() {
        let _ = writeln!(out, "  alternates:     {}", result.alternate_categories.join(", "));
    }
    for (major, keywords) in &result.matched_keywords {
        let _ = writeln!(out, "  matched ({}): {}", major, keywords.join(", "));
    }
    let _ = writeln!(
        out,
        "  processed at:   {}",
        result.processed_at.format("%Y-%m-%d %H:%M:%S")
    );
    out
}

/// Batch summary: one line per file with its three best scores
pub fn render_batch(report: &BatchReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        let scores: Vec<String> = entry
            .top_3_scores
            .iter()
            .map(|s| format!("{} ({:.4})", s.category, s.score))
            .collect();
        let _ = writeln!(out, "{}: {} | {}", entry.file, entry.top_category, scores.join(", "));
    }
    for failure in &report.failures {
        let _ = writeln!(out, "{}: FAILED ({})", failure.file, failure.error);
    }
    let _ = writeln!(
        out,
        "{} processed, {} failed, {}/{} consistent with directory {}",
        report.processed(),
        report.failures.len(),
        report.directory_matches,
        report.entries.len(),
        report.directory.display()
    );
    out
}
