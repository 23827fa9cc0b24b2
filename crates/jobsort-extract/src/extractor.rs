//! Text extractor with OCR fallback

use crate::clean::TextCleaner;
use crate::ocr::{OcrConfig, OcrEngine, TesseractOcr};
use crate::text_layer;
use jobsort_core::Result;
use std::path::Path;
use tracing::{error, info, warn};

/// How the text of a document was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Embedded text layer
    TextLayer,
    /// Rasterized pages run through OCR
    Ocr,
    /// Only the file name could be used
    TitleOnly,
    /// Nothing could be read
    Failed,
}

/// Extracted document text
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Cleaned file name, a newline, then the cleaned page text
    pub text: String,

    /// How the text was obtained
    pub method: ExtractionMethod,

    /// Number of pages read
    pub pages: usize,
}

impl Extraction {
    fn failed() -> Self {
        Self {
            text: String::new(),
            method: ExtractionMethod::Failed,
            pages: 0,
        }
    }
}

/// Converts a document into raw text.
///
/// Implementations fail soft: an unreadable document yields an empty
/// [`Extraction`] with [`ExtractionMethod::Failed`], never an error.
pub trait TextExtractor: Send + Sync {
    /// Extract text and report how it was obtained
    fn extract(&self, path: &Path) -> Extraction;

    /// Extract text only
    fn extract_text(&self, path: &Path) -> String {
        self.extract(path).text
    }
}

/// PDF extractor: text layer first, OCR when the text layer is empty
pub struct PdfExtractor {
    cleaner: TextCleaner,
    ocr: Option<Box<dyn OcrEngine>>,
}

impl PdfExtractor {
    /// Create an extractor with the given OCR engine (`None` disables OCR)
    pub fn new(ocr: Option<Box<dyn OcrEngine>>) -> Result<Self> {
        Ok(Self {
            cleaner: TextCleaner::new()?,
            ocr,
        })
    }

    /// Create an extractor from OCR settings, using Tesseract when enabled
    pub fn from_config(config: &OcrConfig) -> Result<Self> {
        let ocr: Option<Box<dyn OcrEngine>> = if config.enabled {
            let engine = TesseractOcr::new(config.clone());
            if !engine.is_available() {
                warn!("OCR enabled but pdftoppm/tesseract are unavailable; scanned PDFs will not be read");
            }
            Some(Box::new(engine))
        } else {
            None
        };
        Self::new(ocr)
    }

    /// Cleaned text layer, pages joined by newlines (file name not included)
    pub fn extract_text_layer(&self, path: &Path) -> Result<(String, usize)> {
        let pages = text_layer::extract_pages(path)?;
        let count = pages.len();
        Ok((self.join_pages(&pages), count))
    }

    /// Cleaned OCR text, pages joined by newlines (file name not included)
    pub fn extract_with_ocr(&self, path: &Path, engine: &dyn OcrEngine) -> Result<(String, usize)> {
        let pages = engine.recognize_pages(path)?;
        let count = pages.len();
        Ok((self.join_pages(&pages), count))
    }

    fn join_pages(&self, pages: &[String]) -> String {
        pages
            .iter()
            .map(|page| self.cleaner.clean(page))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn with_title(&self, path: &Path, body: &str) -> String {
        format!("{}\n{}", self.cleaner.title_line(path), body)
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Extraction {
        let text_layer_readable = match self.extract_text_layer(path) {
            Ok((body, pages)) if !body.trim().is_empty() => {
                info!("Extracted {} pages from text layer of {}", pages, path.display());
                return Extraction {
                    text: self.with_title(path, &body),
                    method: ExtractionMethod::TextLayer,
                    pages,
                };
            }
            Ok(_) => {
                info!("No text layer in {}, falling back to OCR", path.display());
                true
            }
            Err(e) => {
                warn!("Text layer unreadable for {}: {}", path.display(), e);
                false
            }
        };

        if let Some(engine) = self.ocr.as_deref() {
            metrics::counter!("jobsort_ocr_fallbacks_total").increment(1);
            match self.extract_with_ocr(path, engine) {
                Ok((body, pages)) => {
                    info!("OCR read {} pages from {}", pages, path.display());
                    return Extraction {
                        text: self.with_title(path, &body),
                        method: ExtractionMethod::Ocr,
                        pages,
                    };
                }
                Err(e) => error!("OCR failed for {}: {}", path.display(), e),
            }
        }

        if text_layer_readable {
            Extraction {
                text: self.with_title(path, ""),
                method: ExtractionMethod::TitleOnly,
                pages: 0,
            }
        } else {
            Extraction::failed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobsort_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubOcr {
        pages: Vec<String>,
        calls: Arc<AtomicUsize>,
    }

    impl OcrEngine for StubOcr {
        fn is_available(&self) -> bool {
            true
        }

        fn recognize_pages(&self, _pdf_path: &Path) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.pages.clone())
        }
    }

    struct BrokenOcr;

    impl OcrEngine for BrokenOcr {
        fn is_available(&self) -> bool {
            false
        }

        fn recognize_pages(&self, _pdf_path: &Path) -> Result<Vec<String>> {
            Err(Error::ocr("no tesseract"))
        }
    }

    #[test]
    fn test_unreadable_pdf_falls_back_to_ocr() {
        let calls = Arc::new(AtomicUsize::new(0));
        let extractor = PdfExtractor::new(Some(Box::new(StubOcr {
            pages: vec!["Offre d'alternance!".to_string(), "Génie civil.".to_string()],
            calls: calls.clone(),
        })))
        .unwrap();

        let extraction = extractor.extract(Path::new("/nonexistent/offre_btp.pdf"));

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(extraction.method, ExtractionMethod::Ocr);
        assert_eq!(extraction.pages, 2);
        assert_eq!(extraction.text, "offrebtppdf\nOffre dalternance\nGénie civil");
    }

    #[test]
    fn test_everything_failing_yields_empty_text() {
        let extractor = PdfExtractor::new(Some(Box::new(BrokenOcr))).unwrap();
        let extraction = extractor.extract(Path::new("/nonexistent/offre.pdf"));
        assert_eq!(extraction.method, ExtractionMethod::Failed);
        assert!(extraction.text.is_empty());
        assert_eq!(extractor.extract_text(Path::new("/nonexistent/offre.pdf")), "");
    }

    #[test]
    fn test_without_ocr_unreadable_pdf_is_empty() {
        let extractor = PdfExtractor::new(None).unwrap();
        let extraction = extractor.extract(Path::new("/nonexistent/offre.pdf"));
        assert_eq!(extraction.method, ExtractionMethod::Failed);
        assert_eq!(extraction.text, "");
    }

    #[test]
    fn test_disabled_ocr_config_builds_extractor_without_engine() {
        let config = OcrConfig {
            enabled: false,
            ..OcrConfig::default()
        };
        let extractor = PdfExtractor::from_config(&config).unwrap();
        assert!(extractor.ocr.is_none());
    }
}
