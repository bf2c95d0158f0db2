//! Data models shared by the discovery, fetch and assembly stages.
//!
//! - [`Category`]: which kind of FOMC communication is being collected
//! - [`Locator`]: a site-relative path produced by discovery
//! - [`FetchedDocument`]: one filled result slot from the concurrent fetcher
//! - [`DocumentRecord`]: one row of the assembled corpus

use crate::errors::FomcError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Site-relative path identifying one document (or, transiently, one
/// press-conference landing page). Ordering among locators is discovery order.
pub type Locator = String;

/// The kind of communication to collect.
///
/// Selects the discovery policy, the pattern set and the body extraction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Post-meeting policy statements.
    Statement,
    /// Meeting minutes.
    Minutes,
    /// Press-conference transcripts (PDF).
    Script,
    /// Speeches by board members.
    Speech,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Statement,
        Category::Minutes,
        Category::Script,
        Category::Speech,
    ];

    /// Lowercase name, as accepted on the command line and used in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Statement => "statement",
            Category::Minutes => "minutes",
            Category::Script => "script",
            Category::Speech => "speech",
        }
    }

    /// Only speeches carry an author token.
    pub fn has_authors(&self) -> bool {
        matches!(self, Category::Speech)
    }

    /// Scripts are PDFs; everything else is an HTML page.
    pub fn is_pdf(&self) -> bool {
        matches!(self, Category::Script)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FomcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "statement" => Ok(Category::Statement),
            "minutes" => Ok(Category::Minutes),
            "script" => Ok(Category::Script),
            "speech" => Ok(Category::Speech),
            _ => Err(FomcError::UnsupportedCategory(s.to_string())),
        }
    }
}

/// The content of one result slot, written exactly once by the task that
/// fetched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    /// Discovery-order index of the locator this document came from.
    pub position: usize,
    pub date: NaiveDate,
    /// Present only for categories that carry authors.
    pub author: Option<String>,
    pub content: String,
}

/// One row of the assembled corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Zero-based discovery index; the correlation key through the fetch stage.
    pub position: usize,
    /// Publication date parsed from the locator.
    pub date: NaiveDate,
    /// Speaker token for speeches, absent for every other category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Extracted, trimmed text.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("Statement".parse::<Category>().unwrap(), Category::Statement);
        assert_eq!("MINUTES".parse::<Category>().unwrap(), Category::Minutes);
        assert_eq!(" script ".parse::<Category>().unwrap(), Category::Script);
        assert_eq!("speech".parse::<Category>().unwrap(), Category::Speech);
    }

    #[test]
    fn test_category_from_str_rejects_unknown() {
        let err = "testimony".parse::<Category>().unwrap_err();
        assert!(matches!(err, FomcError::UnsupportedCategory(ref c) if c == "testimony"));
    }

    #[test]
    fn test_category_flags() {
        assert!(Category::Speech.has_authors());
        assert!(!Category::Statement.has_authors());
        assert!(Category::Script.is_pdf());
        assert!(!Category::Minutes.is_pdf());
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Minutes).unwrap();
        assert_eq!(json, "\"minutes\"");
        for category in Category::ALL {
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn test_record_without_author_omits_field() {
        let record = DocumentRecord {
            position: 0,
            date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            author: None,
            content: "Text".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"date\":\"2023-02-01\""));
        assert!(!json.contains("author"));
    }

    #[test]
    fn test_record_round_trips_author() {
        let json = r#"{"position":3,"date":"2019-06-04","author":"powell","content":"Remarks"}"#;
        let record: DocumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.author.as_deref(), Some("powell"));
        assert_eq!(record.position, 3);
    }
}
