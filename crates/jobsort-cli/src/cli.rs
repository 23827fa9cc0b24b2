use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jobsort")]
#[command(
    author,
    version,
    about = "Classify job-offer PDFs by contract type and academic major"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "jobsort.yaml", env = "JOBSORT_CONFIG")]
    pub config: PathBuf,

    /// Keyword CSV, overrides `keywords_path` from the configuration
    #[arg(short, long, global = true)]
    pub keywords: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify one or more PDF files
    Classify {
        /// PDF files to classify
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Copy each file into a contract/degree/major tree under this root
        #[arg(long, value_name = "ROOT")]
        file_into: Option<PathBuf>,

        /// Also file under the alternate majors
        #[arg(long, requires = "file_into")]
        with_alternates: bool,

        /// File under this major instead of the detected one (repeatable,
        /// must name a major of the keyword table)
        #[arg(long = "major", value_name = "NAME", requires = "file_into", conflicts_with = "with_alternates")]
        majors: Vec<String>,

        /// Flip the detected contract type (Stage <-> Alternance) before filing
        #[arg(long)]
        toggle_contract: bool,
    },

    /// Classify every PDF in a directory and print a summary
    Batch {
        /// Directory of PDFs, ideally named after the expected major
        directory: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the majors of the keyword table
    Majors,

    /// Download missing linguistic resources and show where they live
    Resources,
}
