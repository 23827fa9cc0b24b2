//! Command-line front end for jobsort
//!
//! Argument parsing, human-readable reports and filing of classified offers
//! into a contract/degree/major directory tree.

pub mod cli;
pub mod filing;
pub mod report;

pub use cli::*;
pub use filing::{destinations, file_document, filing_majors, FilingOutcome, DEGREE_KEYWORDS};
pub use report::{render_batch, render_result};
