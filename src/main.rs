//! Command-line entry point: `fomc_corpus <statement|minutes|script|speech>`.
//!
//! ```sh
//! fomc_corpus speech --from-year 2015 --base-dir ./data
//! ```

use clap::Parser;
use fomc_corpus::cli::Cli;
use fomc_corpus::config::FomcConfig;
use fomc_corpus::errors::FomcError;
use fomc_corpus::transport::{HttpSource, LopdfExtractor};
use fomc_corpus::{corpus, fetcher, outputs, scrapers, utils};
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Log a fatal error with the stage that raised it, then hand it back.
fn fail(stage: &'static str, e: FomcError) -> Box<dyn Error> {
    error!(stage, error = %e, "Run aborted");
    Box::new(e)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Parse CLI first: a usage error exits before anything else happens
    let args = Cli::parse();

    // --- Tracing init ---
    let default_level = if args.quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let category = args.category;
    info!(%category, "fomc_corpus starting up");
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = FomcConfig::load(args.config.as_deref()).map_err(|e| fail("config", e))?;
    args.apply(&mut config);
    config.validate().map_err(|e| fail("config", e))?;
    debug!(?config, "Resolved configuration");

    utils::ensure_writable_dir(&config.base_dir)
        .await
        .map_err(|e| fail("config", e))?;

    let source = Arc::new(HttpSource::new(&config).map_err(|e| fail("config", e))?);
    let extractor = Arc::new(LopdfExtractor);

    // ---- Discover ----
    let locators = scrapers::discover(source.as_ref(), &config, category, config.from_year)
        .await
        .map_err(|e| fail("discovery", e))?;
    info!(count = locators.len(), "Total documents to fetch");

    // ---- Fetch ----
    let documents = fetcher::fetch_all(&locators, category, &config, source, extractor)
        .await
        .map_err(|e| fail("fetch", e))?;

    // ---- Assemble ----
    let corpus = corpus::from_fetched(category, documents).map_err(|e| fail("assemble", e))?;
    info!(
        records = corpus.len(),
        first = ?corpus.first_date(),
        last = ?corpus.last_date(),
        "Corpus ready"
    );

    // ---- Persist ----
    let json_path = outputs::json::write_corpus(&corpus, &config.base_dir)
        .await
        .map_err(|e| fail("persist", e))?;
    let text_paths = outputs::texts::save_texts(&corpus, &config.base_dir)
        .await
        .map_err(|e| fail("persist", e))?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        json = %json_path.display(),
        text_files = text_paths.len(),
        "Execution complete"
    );
    Ok(())
}
