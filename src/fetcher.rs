//! Bounded concurrent document fetcher.
//!
//! Every locator gets a result slot before anything is dispatched; slot `i`
//! belongs to locator `i` and is written once, when its task is joined. Tasks
//! are spawned onto the runtime through a sliding window of at most
//! `max_threads` handles. While the window is full the scheduler waits for
//! the oldest outstanding task, so peak concurrency is bounded and the output
//! order is discovery order whatever order the tasks finish in.
//!
//! Per task:
//! - **script**: download the PDF, keep a copy under `script_pdf/`, extract
//!   its text on the blocking pool
//! - **everything else**: fetch the HTML page and join the text of every
//!   `<p>` with a blank line
//!
//! Under [`FailurePolicy::Abort`] the first failure seen, in window order,
//! cancels the in-flight tasks and fails the batch. Under
//! [`FailurePolicy::Isolate`] the failing slot is logged and left out.

use crate::config::{FailurePolicy, FomcConfig};
use crate::errors::FomcError;
use crate::metadata::{date_label, extract_author, extract_date};
use crate::models::{Category, FetchedDocument, Locator};
use crate::transport::{PageSource, PdfTextExtractor, fetch_html};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));

type Window = VecDeque<(usize, JoinHandle<Result<FetchedDocument, FomcError>>)>;

/// Fetch the body of every locator, at most `config.max_threads` at a time.
///
/// # Arguments
///
/// * `locators` - Site-relative locators, in discovery order
/// * `category` - Selects the HTML or PDF path and whether authors are kept
/// * `config` - Base URL, concurrency ceiling, output dir and failure policy
/// * `source` - Page transport shared by every task
/// * `extractor` - PDF text extractor, run on the blocking pool
///
/// # Returns
///
/// One [`FetchedDocument`] per locator, in `locators` order. Under
/// [`FailurePolicy::Isolate`] failed positions are missing from the output.
///
/// # Errors
///
/// Under [`FailurePolicy::Abort`], the first failure seen in window order:
/// [`FomcError::Fetch`], [`FomcError::Parse`] for a locator without a date,
/// [`FomcError::Extraction`], or an I/O error saving a script PDF.
#[instrument(level = "info", skip_all, fields(%category, total = locators.len(), ceiling = config.max_threads))]
pub async fn fetch_all<S, E>(
    locators: &[Locator],
    category: Category,
    config: &FomcConfig,
    source: Arc<S>,
    extractor: Arc<E>,
) -> Result<Vec<FetchedDocument>, FomcError>
where
    S: PageSource + 'static,
    E: PdfTextExtractor + 'static,
{
    let ceiling = config.max_threads.max(1);
    let base = config.base()?;
    let pdf_dir = config.script_pdf_dir();
    let policy = config.failure_policy;

    let mut slots: Vec<Option<FetchedDocument>> = (0..locators.len()).map(|_| None).collect();
    let mut window: Window = VecDeque::with_capacity(ceiling);
    let mut failed = 0usize;
    let mut next = 0usize;

    info!("Fetching documents");
    while next < locators.len() {
        if window.len() < ceiling {
            let task = FetchTask {
                position: next,
                locator: locators[next].clone(),
                category,
                base: base.clone(),
                pdf_dir: pdf_dir.clone(),
                source: Arc::clone(&source),
                extractor: Arc::clone(&extractor),
            };
            window.push_back((next, tokio::spawn(task.run())));
            next += 1;
        } else if let Some((position, handle)) = window.pop_front() {
            settle(&mut slots, &mut window, position, handle, policy, &mut failed).await?;
        }
    }
    while let Some((position, handle)) = window.pop_front() {
        settle(&mut slots, &mut window, position, handle, policy, &mut failed).await?;
    }

    let documents: Vec<FetchedDocument> = slots
        .into_iter()
        .flatten()
        .map(|mut doc| {
            doc.content = doc.content.trim().to_string();
            doc
        })
        .collect();

    info!(fetched = documents.len(), failed, "Fetched documents");
    Ok(documents)
}

/// Join one task and write its slot, applying the failure policy.
async fn settle(
    slots: &mut [Option<FetchedDocument>],
    window: &mut Window,
    position: usize,
    handle: JoinHandle<Result<FetchedDocument, FomcError>>,
    policy: FailurePolicy,
    failed: &mut usize,
) -> Result<(), FomcError> {
    let outcome = match handle.await {
        Ok(result) => result,
        Err(join_err) => Err(FomcError::from(join_err)),
    };
    match outcome {
        Ok(document) => {
            debug!(position, bytes = document.content.len(), "Slot filled");
            slots[position] = Some(document);
            Ok(())
        }
        Err(e) if policy == FailurePolicy::Isolate => {
            warn!(position, error = %e, "Fetch failed; leaving slot empty");
            *failed += 1;
            Ok(())
        }
        Err(e) => {
            error!(position, error = %e, in_flight = window.len(), "Fetch failed; aborting batch");
            for (_, pending) in window.drain(..) {
                pending.abort();
            }
            Err(e)
        }
    }
}

/// Everything one task needs, owned so it can move onto the runtime.
struct FetchTask<S, E> {
    position: usize,
    locator: Locator,
    category: Category,
    base: Url,
    pdf_dir: PathBuf,
    source: Arc<S>,
    extractor: Arc<E>,
}

impl<S, E> FetchTask<S, E>
where
    S: PageSource + 'static,
    E: PdfTextExtractor + 'static,
{
    async fn run(self) -> Result<FetchedDocument, FomcError> {
        let url = self.base.join(&self.locator)?;
        let label = date_label(&self.locator)?;
        let date = extract_date(&self.locator)?;
        let author = self
            .category
            .has_authors()
            .then(|| extract_author(&self.locator));
        debug!(position = self.position, %url, %date, "Fetching document");

        let content = if self.category.is_pdf() {
            let file_name = format!("FOMC_PresConfScript_{}.pdf", label.replace('/', "-"));
            self.fetch_pdf(url.as_str(), self.pdf_dir.join(file_name)).await?
        } else {
            let html = fetch_html(self.source.as_ref(), url.as_str()).await?;
            paragraph_text(&html)
        };
        debug!(
            position = self.position,
            preview = %truncate_for_log(&content, 80),
            "Fetched document"
        );

        Ok(FetchedDocument {
            position: self.position,
            date,
            author,
            content,
        })
    }

    /// Download a PDF, keep it at `path`, and return its trimmed text.
    async fn fetch_pdf(&self, url: &str, path: PathBuf) -> Result<String, FomcError> {
        let bytes = self.source.fetch(url).await?;
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, &bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Saved PDF");

        let extractor = Arc::clone(&self.extractor);
        let locator = self.locator.clone();
        let text = tokio::task::spawn_blocking(move || extractor.extract_text(&bytes))
            .await?
            .map_err(|e| match e {
                FomcError::Extraction { source, .. } => FomcError::Extraction { locator, source },
                other => other,
            })?;
        Ok(text.trim().to_string())
    }
}

/// Text of every `<p>` in document order, each trimmed, joined by a blank line.
pub fn paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .join("\n\n")
}
