//! Date and author extraction from locator strings. No network access.
//!
//! FOMC locators embed the publication date as an 8-digit `YYYYMMDD` run,
//! e.g. `/newsevents/pressreleases/monetary20230201a.htm`. Speech locators
//! also carry the speaker between the path prefix and the date run, e.g.
//! `/newsevents/speech/powell20230201a.htm`.

use crate::errors::FomcError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Returned by [`extract_author`] when the locator has no speaker segment.
pub const NO_AUTHOR: &str = "none";

static DATE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{8}").expect("valid date regex"));

static SPEAKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:newsevents/speech/|boarddocs/speeches/\d{4}/)(.*)\d{8}(.*)")
        .expect("valid speaker regex")
});

/// The date portion of a locator in the site's own `Y/M/D` spelling.
///
/// When the month tens digit is `0` the month is written as a single digit
/// (`20230201` becomes `2023/2/01`). Older locators are named this way and
/// the label is reused for file names, so the spelling is kept as is.
pub fn date_label(locator: &str) -> Result<String, FomcError> {
    let run = DATE_RUN
        .find(locator)
        .ok_or_else(|| FomcError::parse(locator, "no 8-digit date run"))?
        .as_str();
    let label = if &run[4..5] == "0" {
        format!("{}/{}/{}", &run[..4], &run[5..6], &run[6..])
    } else {
        format!("{}/{}/{}", &run[..4], &run[4..6], &run[6..])
    };
    Ok(label)
}

/// Publication date of the document behind `locator`.
pub fn extract_date(locator: &str) -> Result<NaiveDate, FomcError> {
    let label = date_label(locator)?;
    NaiveDate::parse_from_str(&label, "%Y/%m/%d")
        .map_err(|e| FomcError::parse(locator, format!("invalid date '{label}': {e}")))
}

/// Speaker token of a speech locator, or [`NO_AUTHOR`] if the locator does
/// not follow a speech naming scheme. The token may be empty when the scheme
/// matches but carries no speaker segment.
pub fn extract_author(locator: &str) -> String {
    SPEAKER
        .captures(locator)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NO_AUTHOR.to_string())
}
