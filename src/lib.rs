//! # FOMC Corpus
//!
//! Collects Federal Open Market Committee communications (policy statements,
//! meeting minutes, press-conference transcripts and speeches) from the
//! Federal Reserve website into one date-indexed corpus.
//!
//! ## Architecture
//!
//! The pipeline runs in four stages, each taking the previous stage's output
//! by value:
//! 1. **Discovery** ([`scrapers::discover`]): walk the calendar and yearly
//!    archive pages for the category and collect document locators
//! 2. **Fetching** ([`fetcher::fetch_all`]): download every document with a
//!    bounded number in flight, extracting paragraph text (HTML) or PDF text
//! 3. **Assembly** ([`corpus::from_fetched`]): zip dates, authors and texts
//!    into records sorted by date
//! 4. **Output** ([`outputs`]): write the corpus as JSON plus one text file
//!    per record

pub mod cli;
pub mod config;
pub mod corpus;
pub mod errors;
pub mod fetcher;
pub mod metadata;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod transport;
pub mod utils;
