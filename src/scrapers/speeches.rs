//! Speech archive discovery.
//!
//! Speeches have no live calendar page. The archive is one page per year
//! under two URL schemes: `{year}speech.htm` up to the speech cutoff and
//! `{year}-speeches.htm` after it. A year is only ever scanned with the
//! scheme (and link pattern) that belongs to it.

use super::patterns::{LinkRule, PatternSet};
use super::scan_page;
use crate::config::FomcConfig;
use crate::errors::FomcError;
use crate::models::Locator;
use crate::transport::PageSource;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::ops::RangeInclusive;
use tracing::{info, instrument};

#[instrument(level = "info", skip(source, config, patterns))]
pub async fn discover<S: PageSource>(
    source: &S,
    config: &FomcConfig,
    patterns: &PatternSet,
    from_year: i32,
    to_year: i32,
) -> Result<Vec<Locator>, FomcError> {
    let mut from_year = from_year;
    if from_year < config.speech_archive_floor {
        info!(
            floor = config.speech_archive_floor,
            "Speech archive starts later than requested; clamping from_year"
        );
        from_year = config.speech_archive_floor;
    }

    let mut links = Vec::new();
    let cutoff = config.historical_date_speech;

    if from_year <= cutoff {
        let legacy = scan_years(
            source,
            from_year..=cutoff,
            |year| config.legacy_speech_url(year),
            &patterns.archive,
        )
        .await?;
        links.extend(legacy);
    }

    let modern_rule = patterns.modern_archive.as_ref().unwrap_or(&patterns.archive);
    let modern = scan_years(
        source,
        from_year.max(cutoff + 1)..=to_year,
        |year| config.modern_speech_url(year),
        modern_rule,
    )
    .await?;
    links.extend(modern);

    Ok(links)
}

/// Scan one archive page per year, oldest first, one page at a time.
async fn scan_years<S, F>(
    source: &S,
    years: RangeInclusive<i32>,
    url_for: F,
    rule: &LinkRule,
) -> Result<Vec<Locator>, FomcError>
where
    S: PageSource,
    F: Fn(i32) -> String,
{
    let per_year: Vec<Vec<Locator>> = stream::iter(years)
        .then(|year| {
            let url = url_for(year);
            async move {
                let links = scan_page(source, &url, rule).await?;
                info!(year, count = links.len(), "Speeches found");
                Ok::<_, FomcError>(links)
            }
        })
        .try_collect()
        .await?;
    Ok(per_year.into_iter().flatten().collect())
}
