//! One plain-text file per corpus record.
//!
//! Files are named `FOMC_{category}_{YYYY-MM-DD}.txt`, with `_{author}`
//! before the extension for speeches, and live in `{base_dir}/{category}/`.
//! When a name is already taken in the same run (two statements on one day,
//! or two speeches by one speaker on one day) the record's discovery
//! position is appended: `FOMC_statement_2023-02-01_3.txt`.

use crate::corpus::Corpus;
use crate::errors::FomcError;
use crate::models::DocumentRecord;
use crate::utils::file_token;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// File name for one record, before collision handling.
pub fn text_file_name(corpus: &Corpus, record: &DocumentRecord) -> String {
    let date = record.date.format("%Y-%m-%d");
    match record.author {
        Some(ref author) if corpus.category.has_authors() => {
            format!("FOMC_{}_{}_{}.txt", corpus.category, date, file_token(author))
        }
        _ => format!("FOMC_{}_{}.txt", corpus.category, date),
    }
}

/// Write every record's content under `{base_dir}/{category}/`.
///
/// # Arguments
///
/// * `corpus` - The assembled corpus
/// * `base_dir` - Output root; the category directory is created if missing
///
/// # Returns
///
/// One path per record, in corpus order. Paths are distinct, so no record
/// overwrites another.
///
/// # Errors
///
/// Returns [`FomcError::Io`] on the first file that cannot be written.
#[instrument(level = "info", skip_all, fields(base_dir = %base_dir.display(), category = %corpus.category))]
pub async fn save_texts(corpus: &Corpus, base_dir: &Path) -> Result<Vec<PathBuf>, FomcError> {
    let dir = base_dir.join(corpus.category.as_str());
    fs::create_dir_all(&dir).await?;

    let mut taken = HashSet::with_capacity(corpus.len());
    let mut written = Vec::with_capacity(corpus.len());
    for record in corpus.iter() {
        let mut name = text_file_name(corpus, record);
        if !taken.insert(name.clone()) {
            name = with_position(&name, record.position);
            debug!(%name, "Name already used this run, suffixing position");
            taken.insert(name.clone());
        }
        let path = dir.join(name);
        debug!(path = %path.display(), "Writing text");
        fs::write(&path, &record.content).await?;
        written.push(path);
    }
    info!(files = written.len(), dir = %dir.display(), "Wrote text files");
    Ok(written)
}

fn with_position(name: &str, position: usize) -> String {
    match name.strip_suffix(".txt") {
        Some(stem) => format!("{stem}_{position}.txt"),
        None => format!("{name}_{position}"),
    }
}
