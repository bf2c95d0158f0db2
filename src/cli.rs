//! Command-line interface definitions for the FOMC corpus builder.
//!
//! The only required argument is the category. Everything else overrides a
//! value from [`FomcConfig`], either directly or through an environment
//! variable. An invalid or missing category is rejected by clap before any
//! I/O happens, with a usage message and a non-zero exit status.

use crate::config::{FailurePolicy, FomcConfig};
use crate::errors::FomcError;
use crate::models::Category;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Every statement since the archive begins
/// fomc_corpus statement
///
/// # Speeches from 2015 on, 4 fetches at a time, into ./data
/// fomc_corpus speech --from-year 2015 --max-threads 4 --base-dir ./data
///
/// # Keep going past individual fetch failures
/// fomc_corpus minutes --keep-going
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// One of: statement, minutes, script, speech
    #[arg(value_parser = parse_category)]
    pub category: Category,

    /// First year to collect from
    #[arg(short, long, env = "FOMC_FROM_YEAR")]
    pub from_year: Option<i32>,

    /// Directory for the dataset, per-record text files and script PDFs
    #[arg(short, long, env = "FOMC_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Maximum number of documents fetched at once
    #[arg(short, long, env = "FOMC_MAX_THREADS")]
    pub max_threads: Option<usize>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds (requests are unbounded by default)
    #[arg(long, env = "FOMC_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Log and skip documents that fail to fetch instead of aborting the run
    #[arg(long)]
    pub keep_going: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut FomcConfig) {
        if let Some(from_year) = self.from_year {
            config.from_year = from_year;
        }
        if let Some(ref base_dir) = self.base_dir {
            config.base_dir = base_dir.clone();
        }
        if let Some(max_threads) = self.max_threads {
            config.max_threads = max_threads;
        }
        if self.timeout_secs.is_some() {
            config.timeout_secs = self.timeout_secs;
        }
        if self.keep_going {
            config.failure_policy = FailurePolicy::Isolate;
        }
    }
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse::<Category>().map_err(|_| {
        let choices: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        FomcError::Usage(format!("please specify ONE of ({})", choices.join(", "))).to_string()
    })
}
