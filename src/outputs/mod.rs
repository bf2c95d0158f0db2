//! Persistence adapters for the assembled corpus.
//!
//! Both run only after a corpus has been assembled, so a failed run never
//! replaces an earlier dataset.
//!
//! # Output Structure
//!
//! ```text
//! base_dir/
//! ├── speech.json                                  # whole corpus
//! ├── speech/
//! │   ├── FOMC_speech_2023-02-01_powell.txt        # one file per record
//! │   └── ...
//! └── script_pdf/
//!     └── FOMC_PresConfScript_2023-2-01.pdf        # written by the fetcher
//! ```

pub mod json;
pub mod texts;
