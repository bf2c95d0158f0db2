//! Link discovery for FOMC communications.
//!
//! Discovery turns a category and a starting year into an ordered list of
//! site-relative locators. The order is scan order: the live calendar page
//! first where the category has one, then per-year archive pages from the
//! oldest year to the newest. That order becomes each locator's position in
//! the fetch stage.
//!
//! | Category | Live page | Archive pages | Notes |
//! |----------|-----------|---------------|-------|
//! | statement | calendar | `fomchistorical{Y}.htm` through 2014 | archive links matched by anchor text |
//! | minutes | calendar | `fomchistorical{Y}.htm` through 2014 | |
//! | script | calendar | `fomchistorical{Y}.htm` through 2014 | calendar yields landing pages; each is fetched for its PDF link |
//! | speech | none | `{Y}speech.htm` through 2010, then `{Y}-speeches.htm` | archive starts in 1996 |
//!
//! Pages are fetched one at a time. Any fetch failure aborts discovery.

pub mod calendar;
pub mod patterns;
pub mod speeches;

use crate::config::FomcConfig;
use crate::errors::FomcError;
use crate::models::{Category, Locator};
use crate::transport::{PageSource, fetch_html};
use chrono::{Datelike, Local};
use patterns::{LinkRule, PatternSet};
use tracing::{debug, info, instrument};

/// Discover every locator for `category` from `from_year` up to today.
///
/// # Arguments
///
/// * `source` - Page transport
/// * `config` - Site URLs and archive cutoffs
/// * `category` - Which kind of document to look for
/// * `from_year` - First archive year to scan
///
/// # Returns
///
/// Site-relative locators in discovery order: live calendar links first,
/// then per-year archive links oldest year first. Nothing is deduplicated.
///
/// # Errors
///
/// Returns [`FomcError::Fetch`] if any visited page cannot be retrieved.
#[instrument(level = "info", skip(source, config))]
pub async fn discover<S: PageSource>(
    source: &S,
    config: &FomcConfig,
    category: Category,
    from_year: i32,
) -> Result<Vec<Locator>, FomcError> {
    let to_year = Local::now().year();
    discover_with(
        source,
        config,
        category,
        PatternSet::for_category(category),
        from_year,
        to_year,
    )
    .await
}

/// Discover with an explicit pattern set and final archive year.
pub async fn discover_with<S: PageSource>(
    source: &S,
    config: &FomcConfig,
    category: Category,
    patterns: &PatternSet,
    from_year: i32,
    to_year: i32,
) -> Result<Vec<Locator>, FomcError> {
    let links = match category {
        Category::Statement | Category::Minutes | Category::Script => {
            calendar::discover(source, config, category, patterns, from_year).await?
        }
        Category::Speech => speeches::discover(source, config, patterns, from_year, to_year).await?,
    };
    info!(total = links.len(), %category, "Discovered links");
    Ok(links)
}

/// Fetch one page and collect the links `rule` selects from it.
pub(crate) async fn scan_page<S: PageSource>(
    source: &S,
    url: &str,
    rule: &LinkRule,
) -> Result<Vec<Locator>, FomcError> {
    let html = fetch_html(source, url).await?;
    let links = rule.collect_from(&html);
    debug!(%url, count = links.len(), "Scanned page");
    Ok(links)
}
