//! jobsort Core
//!
//! Core types and error handling shared across jobsort components.
//!
//! This crate provides:
//! - The error taxonomy (extraction, OCR, resources, configuration, classification)
//! - Result types handed to callers: per-document classifications and batch reports

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    BatchEntry, BatchFailure, BatchReport, CategoryScore, ClassificationResult, ContractType,
    UNCLASSIFIED,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{CategoryScore, ClassificationResult, ContractType, UNCLASSIFIED};
}
