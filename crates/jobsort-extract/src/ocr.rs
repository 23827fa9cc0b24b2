//! OCR fallback for scanned PDFs
//!
//! Pages are rasterized with `pdftoppm` (poppler-utils) and recognized with
//! `tesseract`. Both tools must be on `PATH` (or configured explicitly).
//! Recognition is CPU-bound and runs synchronously, one page at a time.

use jobsort_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// OCR settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Run OCR when the text layer is empty
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Tesseract language code
    #[serde(default = "default_language")]
    pub language: String,

    /// Rasterization resolution
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// `pdftoppm` executable
    #[serde(default = "default_pdftoppm")]
    pub pdftoppm: PathBuf,

    /// `tesseract` executable
    #[serde(default = "default_tesseract")]
    pub tesseract: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: default_language(),
            dpi: default_dpi(),
            pdftoppm: default_pdftoppm(),
            tesseract: default_tesseract(),
        }
    }
}

/// Optical character recognition over every page of a PDF
pub trait OcrEngine: Send + Sync {
    /// Whether the engine's external tools can be run
    fn is_available(&self) -> bool;

    /// Raw recognized text of every page, in page order
    fn recognize_pages(&self, pdf_path: &Path) -> Result<Vec<String>>;
}

/// Tesseract-backed OCR engine
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    /// Create a new engine from configuration
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Render every page to a PNG inside `dir`, returning the images in page order
    fn rasterize(&self, pdf_path: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
        let output_prefix = dir.join("page");

        let output = Command::new(&self.config.pdftoppm)
            .arg("-png")
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg(pdf_path)
            .arg(&output_prefix)
            .output()
            .map_err(|e| Error::ocr(format!("Failed to run pdftoppm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ocr(format!("pdftoppm failed: {}", stderr.trim())));
        }

        let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();

        // pdftoppm zero-pads page numbers to a common width, so lexical order is page order
        images.sort();

        if images.is_empty() {
            return Err(Error::ocr("pdftoppm produced no images"));
        }

        Ok(images)
    }

    fn recognize_image(&self, image: &Path, page_num: usize) -> Result<String> {
        let output = Command::new(&self.config.tesseract)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .output()
            .map_err(|e| {
                Error::ocr(format!("Failed to run tesseract on page {}: {}", page_num, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Tesseract warning on page {}: {}", page_num, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl OcrEngine for TesseractOcr {
    fn is_available(&self) -> bool {
        let pdftoppm = Command::new(&self.config.pdftoppm).arg("-v").output().is_ok();
        let tesseract = Command::new(&self.config.tesseract)
            .arg("--version")
            .output()
            .is_ok();

        if !pdftoppm {
            debug!("pdftoppm not found - install poppler-utils for OCR support");
        }
        if !tesseract {
            debug!("tesseract not found - install tesseract-ocr for OCR support");
        }

        pdftoppm && tesseract
    }

    fn recognize_pages(&self, pdf_path: &Path) -> Result<Vec<String>> {
        let scratch = tempfile::tempdir()?;

        info!(
            "Starting OCR for {:?} (dpi={}, lang={})",
            pdf_path.file_name().unwrap_or_default(),
            self.config.dpi,
            self.config.language
        );

        let images = self.rasterize(pdf_path, scratch.path())?;
        let total = images.len();
        let mut pages = Vec::with_capacity(total);

        for (i, image) in images.iter().enumerate() {
            info!("Processing page {}/{} (OCR)", i + 1, total);
            pages.push(self.recognize_image(image, i + 1)?);
        }

        Ok(pages)
    }
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "fra".to_string()
}

fn default_dpi() -> u32 {
    300
}

fn default_pdftoppm() -> PathBuf {
    PathBuf::from("pdftoppm")
}

fn default_tesseract() -> PathBuf {
    PathBuf::from("tesseract")
}
