//! Embedded text-layer extraction (pure Rust, lopdf)

use jobsort_core::{Error, Result};
use lopdf::Document;
use std::path::Path;
use tracing::{debug, info};

/// Load a PDF document
pub fn load_pdf(path: &Path) -> Result<Document> {
    Document::load(path)
        .map_err(|e| Error::extraction(format!("Failed to load {}: {}", path.display(), e)))
}

/// Extract the raw text of every page, in page order
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let doc = load_pdf(path)?;
    if doc.is_encrypted() {
        return Err(Error::extraction(format!(
            "{} is encrypted",
            path.display()
        )));
    }

    let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();
    let total = page_numbers.len();
    let mut pages = Vec::with_capacity(total);

    for (i, page_num) in page_numbers.into_iter().enumerate() {
        info!("Processing page {}/{} (text layer)", i + 1, total);
        let text = doc.extract_text(&[page_num]).map_err(|e| {
            Error::extraction(format!("Failed to extract page {}: {}", page_num, e))
        })?;
        debug!(page = page_num, chars = text.len(), "text layer page extracted");
        pages.push(text);
    }

    Ok(pages)
}
