//! Calendar and historical-archive discovery for statements, minutes and
//! press-conference scripts.
//!
//! The live calendar page lists recent meetings. Years up to the statement
//! cutoff are only reachable through one `fomchistorical{year}.htm` page per
//! year. Scripts take an extra hop: the calendar links to a landing page per
//! press conference, and the transcript PDF is linked from there.

use super::patterns::{LinkRule, PatternSet};
use super::scan_page;
use crate::config::FomcConfig;
use crate::errors::FomcError;
use crate::models::{Category, Locator};
use crate::transport::PageSource;
use tracing::{info, instrument, warn};

#[instrument(level = "info", skip(source, config, patterns))]
pub async fn discover<S: PageSource>(
    source: &S,
    config: &FomcConfig,
    category: Category,
    patterns: &PatternSet,
    from_year: i32,
) -> Result<Vec<Locator>, FomcError> {
    let mut links = match patterns.current {
        Some(ref rule) => scan_page(source, &config.calendar_url, rule).await?,
        None => Vec::new(),
    };

    if let Some(ref landing) = patterns.landing {
        links = expand_landing_pages(source, config, landing, links).await?;
    }
    info!(count = links.len(), %category, "Links found in the current page");

    if from_year <= config.historical_date_statement {
        for year in from_year..=config.historical_date_statement {
            let yearly = scan_page(source, &config.historical_url(year), &patterns.archive).await?;
            info!(year, count = yearly.len(), "Links found in yearly archive");
            links.extend(yearly);
        }
    }

    Ok(links)
}

/// Replace each landing-page locator with the document links found on it.
///
/// Runs sequentially, in landing-page order, before any document is fetched.
async fn expand_landing_pages<S: PageSource>(
    source: &S,
    config: &FomcConfig,
    landing: &LinkRule,
    pages: Vec<Locator>,
) -> Result<Vec<Locator>, FomcError> {
    let base = config.base()?;
    let mut links = Vec::with_capacity(pages.len());
    for page in pages {
        let url = base.join(&page)?;
        let found = scan_page(source, url.as_str(), landing).await?;
        if found.is_empty() {
            warn!(%url, "Landing page has no document link");
        }
        links.extend(found);
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::StaticSource;

    const CALENDAR: &str = r#"
        <a href="/newsevents/pressreleases/monetary20230322a.htm">Statement</a>
        <a href="/monetarypolicy/fomcminutes20230322.htm">HTML</a>
        <a href="/monetarypolicy/fomcpresconf20230322.htm">Press Conference</a>
        <a href="/newsevents/pressreleases/monetary20230201a.htm">Statement</a>
        <a href="/monetarypolicy/fomcminutes20230201.htm">HTML</a>
        <a href="/monetarypolicy/fomcpresconf20230201.htm">Press Conference</a>
    "#;

    fn yearly(year: i32) -> String {
        format!(
            r#"<a href="/newsevents/press/monetary/{year}0130a.htm">Statement</a>
               <a href="/monetarypolicy/fomcminutes{year}0130.htm">Minutes</a>
               <a href="/monetarypolicy/files/FOMC{year}0130meeting.pdf">Transcript</a>"#
        )
    }

    #[tokio::test]
    async fn test_minutes_live_page_then_years_in_order() {
        let config = FomcConfig::default();
        let source = StaticSource::new()
            .page(&config.calendar_url, CALENDAR)
            .page(&config.historical_url(2013), yearly(2013))
            .page(&config.historical_url(2014), yearly(2014));

        let links = discover(
            &source,
            &config,
            Category::Minutes,
            PatternSet::for_category(Category::Minutes),
            2013,
        )
        .await
        .unwrap();

        assert_eq!(
            links,
            vec![
                "/monetarypolicy/fomcminutes20230322.htm",
                "/monetarypolicy/fomcminutes20230201.htm",
                "/monetarypolicy/fomcminutes20130130.htm",
                "/monetarypolicy/fomcminutes20140130.htm",
            ]
        );
        assert_eq!(
            source.requests(),
            vec![
                config.calendar_url.clone(),
                config.historical_url(2013),
                config.historical_url(2014),
            ]
        );
    }

    #[tokio::test]
    async fn test_statement_archive_uses_anchor_text() {
        let config = FomcConfig::default();
        let source = StaticSource::new()
            .page(&config.calendar_url, CALENDAR)
            .page(&config.historical_url(2014), yearly(2014));

        let links = discover(
            &source,
            &config,
            Category::Statement,
            PatternSet::for_category(Category::Statement),
            2014,
        )
        .await
        .unwrap();

        assert_eq!(links.len(), 3);
        assert_eq!(links[2], "/newsevents/press/monetary/20140130a.htm");
    }

    #[tokio::test]
    async fn test_script_expands_landing_pages() {
        let config = FomcConfig::default();
        let base = config.base_url.clone();
        let source = StaticSource::new()
            .page(&config.calendar_url, CALENDAR)
            .page(
                &format!("{base}/monetarypolicy/fomcpresconf20230322.htm"),
                r#"<a href="/mediacenter/files/FOMCpresconf20230322.pdf">PDF</a>"#,
            )
            .page(
                &format!("{base}/monetarypolicy/fomcpresconf20230201.htm"),
                r#"<a href="/mediacenter/files/FOMCpresconf20230201.pdf">PDF</a>"#,
            )
            .page(&config.historical_url(2014), yearly(2014));

        let links = discover(
            &source,
            &config,
            Category::Script,
            PatternSet::for_category(Category::Script),
            2014,
        )
        .await
        .unwrap();

        assert_eq!(
            links,
            vec![
                "/mediacenter/files/FOMCpresconf20230322.pdf",
                "/mediacenter/files/FOMCpresconf20230201.pdf",
                "/monetarypolicy/files/FOMC20140130meeting.pdf",
            ]
        );
        let requests = source.requests();
        assert_eq!(requests.len(), 4);
        assert!(requests[1].ends_with("fomcpresconf20230322.htm"));
        assert!(requests[2].ends_with("fomcpresconf20230201.htm"));
    }

    #[tokio::test]
    async fn test_missing_archive_year_aborts() {
        let config = FomcConfig::default();
        let source = StaticSource::new()
            .page(&config.calendar_url, CALENDAR)
            .page(&config.historical_url(2013), yearly(2013));

        let err = discover(
            &source,
            &config,
            Category::Minutes,
            PatternSet::for_category(Category::Minutes),
            2013,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FomcError::Fetch { ref url, .. } if url == &config.historical_url(2014)));
    }

    #[tokio::test]
    async fn test_length_is_sum_of_sources() {
        let config = FomcConfig::default();
        let source = StaticSource::new()
            .page(&config.calendar_url, CALENDAR)
            .fallback(yearly(2000));

        let links = discover(
            &source,
            &config,
            Category::Minutes,
            PatternSet::for_category(Category::Minutes),
            2005,
        )
        .await
        .unwrap();

        // 2 from the calendar, 1 from each of 2005..=2014
        assert_eq!(links.len(), 2 + 10);
    }
}
