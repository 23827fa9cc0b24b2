//! Character stripping applied to every extracted page and to file names

use jobsort_core::{Error, Result};
use regex::Regex;
use std::path::Path;

/// Removes punctuation noise before tokenization.
///
/// Everything that is not a word character, whitespace or `+` is removed,
/// and so are underscores. `+` survives so that names like `C++` keep a
/// recognizable shape.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    symbols: Regex,
}

impl TextCleaner {
    /// Create a new cleaner
    pub fn new() -> Result<Self> {
        Ok(Self {
            symbols: Regex::new(r"[^\w\s+]|_")
                .map_err(|e| Error::extraction(format!("Failed to compile cleaning regex: {}", e)))?,
        })
    }

    /// Strip symbols from a block of text
    pub fn clean(&self, text: &str) -> String {
        self.symbols.replace_all(text, "").into_owned()
    }

    /// Cleaned base name of a file, extension included.
    ///
    /// Used as the synthetic first line of every extracted document.
    pub fn title_line(&self, path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.clean(&name)
    }
}
