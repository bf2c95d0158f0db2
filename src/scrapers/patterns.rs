//! Per-category link patterns.
//!
//! Each [`PatternSet`] says which anchors count as document links on each kind
//! of page a category visits. Discovery only walks pages; what it keeps from
//! them is decided here, so a markup change on the site is a pattern change
//! and nothing else.

use crate::errors::FomcError;
use crate::models::{Category, Locator};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

/// How to pick document links out of a page.
#[derive(Debug, Clone)]
pub enum LinkRule {
    /// Anchors whose `href` matches the pattern.
    Href(Regex),
    /// Anchors whose text, trimmed, equals the string.
    AnchorText(String),
}

impl LinkRule {
    /// Match anchors whose `href` matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`FomcError::Config`] if `pattern` is not a valid regex.
    pub fn href(pattern: &str) -> Result<Self, FomcError> {
        Regex::new(pattern)
            .map(LinkRule::Href)
            .map_err(|e| FomcError::Config(format!("invalid link pattern {pattern:?}: {e}")))
    }

    /// Built-in patterns are constants and always compile.
    fn builtin(pattern: &str) -> Self {
        LinkRule::Href(Regex::new(pattern).expect("valid built-in link pattern"))
    }

    pub fn anchor_text(text: &str) -> Self {
        LinkRule::AnchorText(text.to_string())
    }

    /// `href` values of every matching anchor, in document order.
    pub fn collect(&self, document: &Html) -> Vec<Locator> {
        document
            .select(&ANCHOR)
            .filter(|anchor| match self {
                LinkRule::Href(pattern) => anchor
                    .value()
                    .attr("href")
                    .is_some_and(|href| pattern.is_match(href)),
                LinkRule::AnchorText(text) => anchor.text().collect::<String>().trim() == text,
            })
            .filter_map(|anchor| anchor.value().attr("href"))
            .map(str::to_string)
            .collect()
    }

    /// Parse `html` and collect matching links.
    pub fn collect_from(&self, html: &str) -> Vec<Locator> {
        self.collect(&Html::parse_document(html))
    }
}

/// The link rules for one category.
#[derive(Debug, Clone)]
pub struct PatternSet {
    /// Links on the live calendar page. `None` when the category has no
    /// calendar coverage (speeches).
    pub current: Option<LinkRule>,
    /// Second hop: the document link inside each page found by `current`.
    /// Only press-conference scripts use it.
    pub landing: Option<LinkRule>,
    /// Links on each per-year archive page up to the category's cutoff.
    pub archive: LinkRule,
    /// Links on each per-year archive page after the cutoff (speeches only).
    pub modern_archive: Option<LinkRule>,
}

static STATEMENT: Lazy<PatternSet> = Lazy::new(|| PatternSet {
    current: Some(LinkRule::builtin(
        r"^/newsevents/pressreleases/monetary\d{8}[ax].htm",
    )),
    landing: None,
    archive: LinkRule::anchor_text("Statement"),
    modern_archive: None,
});

static MINUTES: Lazy<PatternSet> = Lazy::new(|| PatternSet {
    current: Some(LinkRule::builtin(r"^/monetarypolicy/fomcminutes\d{8}.htm")),
    landing: None,
    archive: LinkRule::builtin(r"(^/monetarypolicy/fomcminutes|^/fomc/minutes|^/fomc/MINUTES)"),
    modern_archive: None,
});

static SCRIPT: Lazy<PatternSet> = Lazy::new(|| PatternSet {
    current: Some(LinkRule::builtin(r"^/monetarypolicy/fomcpresconf\d{8}.htm")),
    landing: Some(LinkRule::builtin(r"^/mediacenter/files/FOMCpresconf\d{8}.pdf")),
    archive: LinkRule::builtin(r"^/monetarypolicy/files/FOMC\d{8}meeting.pdf"),
    modern_archive: None,
});

// The third alternative of the legacy pattern is literally `d{8}`, as the
// site-facing pattern has always been. It matches nothing on real pages.
static SPEECH: Lazy<PatternSet> = Lazy::new(|| PatternSet {
    current: None,
    landing: None,
    archive: LinkRule::builtin(r"^/newsevents/speech/.*\d{8}.*.htm|^/boarddocs/speeches/\d{4}/|d{8}.*.htm"),
    modern_archive: Some(LinkRule::builtin(r"newsevents/speech/.*\d{8}.*.htm")),
});

impl PatternSet {
    /// Built-in patterns for `category`.
    pub fn for_category(category: Category) -> &'static PatternSet {
        match category {
            Category::Statement => &STATEMENT,
            Category::Minutes => &MINUTES,
            Category::Script => &SCRIPT,
            Category::Speech => &SPEECH,
        }
    }
}
