//! jobsort Extract
//!
//! Turns a PDF file into raw text for classification.
//!
//! The embedded text layer is read first (lopdf). When it is empty or
//! unreadable, pages are rasterized and run through Tesseract OCR. Every page
//! is stripped of punctuation and the cleaned file name is prepended as the
//! first line, because offer file names often carry the role or the major.

pub mod clean;
pub mod extractor;
pub mod ocr;
pub mod text_layer;

pub use clean::TextCleaner;
pub use extractor::{Extraction, ExtractionMethod, PdfExtractor, TextExtractor};
pub use ocr::{OcrConfig, OcrEngine, TesseractOcr};
