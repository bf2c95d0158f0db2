//! JSON serialization of the whole corpus.

use crate::corpus::Corpus;
use crate::errors::FomcError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `corpus` to `{base_dir}/{category}.json`.
///
/// # Arguments
///
/// * `corpus` - The assembled corpus
/// * `base_dir` - Output directory, created if missing
///
/// # Returns
///
/// The path of the JSON file.
///
/// # Errors
///
/// Returns [`FomcError::Io`] if the directory or file cannot be written.
#[instrument(level = "info", skip_all, fields(base_dir = %base_dir.display(), category = %corpus.category))]
pub async fn write_corpus(corpus: &Corpus, base_dir: &Path) -> Result<PathBuf, FomcError> {
    let json = serde_json::to_string(corpus)?;

    if let Err(e) = fs::create_dir_all(base_dir).await {
        error!(error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = base_dir.join(format!("{}.json", corpus.category));
    info!(path = %path.display(), "Writing JSON");
    fs::write(&path, json).await?;
    info!(path = %path.display(), records = corpus.len(), "Wrote corpus JSON");

    Ok(path)
}
