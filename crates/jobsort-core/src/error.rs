//! Error types for jobsort

/// Result type alias using jobsort's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for jobsort operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// PDF text-layer extraction errors
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Rasterization or OCR errors
    #[error("ocr error: {0}")]
    Ocr(String),

    /// Linguistic resource bundle missing and not installable
    #[error("resource missing: {0}")]
    ResourceMissing(String),

    /// Configuration and keyword source errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a new OCR error
    pub fn ocr(msg: impl Into<String>) -> Self {
        Self::Ocr(msg.into())
    }

    /// Create a new missing-resource error
    pub fn resource_missing(msg: impl Into<String>) -> Self {
        Self::ResourceMissing(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error must abort the whole run rather than one document
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ResourceMissing(_))
    }
}
