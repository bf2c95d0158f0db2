//! Corpus assembly and the date-indexed corpus table.
//!
//! [`assemble`] zips the per-position dates, optional authors and contents
//! into [`DocumentRecord`]s and stable-sorts them by date. Same-day records
//! are kept side by side in discovery order, never merged.

use crate::errors::FomcError;
use crate::models::{Category, DocumentRecord, FetchedDocument};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Records of one category, sorted ascending by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub category: Category,
    pub records: Vec<DocumentRecord>,
}

/// Build a corpus from parallel arrays indexed by position.
///
/// # Arguments
///
/// * `category` - Category of every record
/// * `dates` - Publication date per position
/// * `authors` - Speaker token per position; ignored unless the category
///   carries authors
/// * `contents` - Document text per position
///
/// # Returns
///
/// A [`Corpus`] sorted ascending by date, same-day records in position order.
///
/// # Errors
///
/// Returns [`FomcError::Parse`] if the arrays differ in length.
#[instrument(level = "info", skip_all, fields(%category, total = contents.len()))]
pub fn assemble(
    category: Category,
    dates: Vec<NaiveDate>,
    authors: Option<Vec<String>>,
    contents: Vec<String>,
) -> Result<Corpus, FomcError> {
    let positions: Vec<usize> = (0..dates.len()).collect();
    assemble_at(category, positions, dates, authors, contents)
}

/// Build a corpus from fetched documents, keeping their positions.
pub fn from_fetched(category: Category, documents: Vec<FetchedDocument>) -> Result<Corpus, FomcError> {
    let mut positions = Vec::with_capacity(documents.len());
    let mut dates = Vec::with_capacity(documents.len());
    let mut authors = Vec::with_capacity(documents.len());
    let mut contents = Vec::with_capacity(documents.len());
    for doc in documents {
        positions.push(doc.position);
        dates.push(doc.date);
        authors.push(doc.author.unwrap_or_default());
        contents.push(doc.content);
    }
    let authors = category.has_authors().then_some(authors);
    assemble_at(category, positions, dates, authors, contents)
}

fn assemble_at(
    category: Category,
    positions: Vec<usize>,
    dates: Vec<NaiveDate>,
    authors: Option<Vec<String>>,
    contents: Vec<String>,
) -> Result<Corpus, FomcError> {
    if dates.len() != contents.len() {
        return Err(FomcError::parse(
            "corpus",
            format!("{} dates for {} contents", dates.len(), contents.len()),
        ));
    }
    let authors: Vec<Option<String>> = match authors {
        Some(authors) if category.has_authors() => {
            if authors.len() != contents.len() {
                return Err(FomcError::parse(
                    "corpus",
                    format!("{} authors for {} contents", authors.len(), contents.len()),
                ));
            }
            authors.into_iter().map(Some).collect()
        }
        _ => vec![None; contents.len()],
    };

    let mut records: Vec<DocumentRecord> = positions
        .into_iter()
        .zip(dates)
        .zip(authors)
        .zip(contents)
        .map(|(((position, date), author), content)| DocumentRecord {
            position,
            date,
            author,
            content,
        })
        .collect();
    // stable: same-day records stay in position order
    records.sort_by_key(|r| r.date);

    info!(
        records = records.len(),
        first = ?records.first().map(|r| r.date),
        last = ?records.last().map(|r| r.date),
        "Assembled corpus"
    );
    Ok(Corpus { category, records })
}

impl Corpus {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in date order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.iter()
    }

    /// The date index, one entry per record.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// Document texts, aligned with [`Corpus::dates`].
    pub fn contents(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.content.as_str()).collect()
    }

    /// All records published on `date`, in position order.
    pub fn on(&self, date: NaiveDate) -> &[DocumentRecord] {
        let start = self.records.partition_point(|r| r.date < date);
        let end = self.records.partition_point(|r| r.date <= date);
        &self.records[start..end]
    }

    /// Records with `from <= date <= to`.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> &[DocumentRecord] {
        if from > to {
            return &[];
        }
        let start = self.records.partition_point(|r| r.date < from);
        let end = self.records.partition_point(|r| r.date <= to);
        &self.records[start..end]
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}
