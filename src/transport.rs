//! External collaborators: page transport and PDF text extraction.
//!
//! The pipeline never talks to `reqwest` or `lopdf` directly. It goes through
//! two small traits so that discovery and fetching can run against canned
//! pages in tests:
//!
//! - [`PageSource`]: `fetch(url) -> bytes` and `fetch_text(url) -> string`,
//!   implemented by [`HttpSource`]
//! - [`PdfTextExtractor`]: `extract_text(bytes) -> string`, implemented by
//!   [`LopdfExtractor`]
//!
//! HTML is decoded with the page's declared charset (byte order mark, then
//! the `Content-Type` header, then a `<meta>` declaration near the top of the
//! document) and falls back to UTF-8. Raw bytes are only used for PDFs.
//!
//! Neither implementation retries. A failed request surfaces as
//! [`FomcError::Fetch`] and a failed extraction as [`FomcError::Extraction`].

use crate::config::FomcConfig;
use crate::errors::FomcError;
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex as BytesRegex;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Anything that can return the raw body behind a URL.
pub trait PageSource: Send + Sync {
    /// Fetch the body at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FomcError>> + Send;

    /// Fetch the body at `url` and decode it as HTML text.
    ///
    /// The default decodes with [`decode_html`] and no transport charset;
    /// sources that see response headers should pass theirs along.
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, FomcError>> + Send {
        async move {
            let bytes = self.fetch(url).await?;
            Ok(decode_html(&bytes, None))
        }
    }
}

/// Fetch `url` and decode the body as HTML, honouring its declared charset.
///
/// # Arguments
///
/// * `source` - Where the page comes from
/// * `url` - Absolute URL of the page
///
/// # Returns
///
/// The decoded document text.
///
/// # Errors
///
/// Returns [`FomcError::Fetch`] if the page cannot be retrieved.
pub async fn fetch_html<S: PageSource>(source: &S, url: &str) -> Result<String, FomcError> {
    source.fetch_text(url).await
}

// Only the first 1024 bytes are searched, as browsers do.
const META_SNIFF_LEN: usize = 1024;

static META_CHARSET: Lazy<BytesRegex> = Lazy::new(|| {
    BytesRegex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#)
        .expect("valid meta charset regex")
});

/// Decode an HTML body to text.
///
/// The encoding is taken from a byte order mark, then the `charset`
/// parameter of `content_type`, then a `<meta charset>` or
/// `<meta http-equiv="Content-Type">` declaration, and defaults to UTF-8.
/// Unknown labels are skipped. Labels resolve through the WHATWG table, so
/// `iso-8859-1` decodes as windows-1252.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| content_type.and_then(header_charset))
        .or_else(|| meta_charset(bytes))
        .unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = used.name(), "Body had malformed sequences");
    }
    text.into_owned()
}

fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}

fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LEN)];
    META_CHARSET
        .captures_iter(head)
        .filter_map(|caps| caps.get(1))
        .find_map(|label| Encoding::for_label(label.as_bytes()))
}

/// [`PageSource`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Build the client from the configured user agent and optional timeout.
    pub fn new(config: &FomcConfig) -> Result<Self, FomcError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| FomcError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpSource {
    async fn get(&self, url: &str) -> Result<reqwest::Response, FomcError> {
        let t0 = Instant::now();
        self.client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "Request failed");
                FomcError::fetch(url, e)
            })
    }
}

impl PageSource for HttpSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FomcError> {
        let t0 = Instant::now();
        let response = self.get(url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| FomcError::fetch(url, e))?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched"
        );
        Ok(body.to_vec())
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, FomcError> {
        let t0 = Instant::now();
        let response = self.get(url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| FomcError::fetch(url, e))?;
        debug!(
            bytes = body.len(),
            content_type = content_type.as_deref().unwrap_or("-"),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(decode_html(&body, content_type.as_deref()))
    }
}

/// Anything that can turn PDF bytes into plain text.
pub trait PdfTextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, FomcError>;
}

/// [`PdfTextExtractor`] backed by `lopdf`; pages are emitted in page order.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfTextExtractor for LopdfExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, FomcError> {
        let document = lopdf::Document::load_mem(bytes).map_err(extraction_error)?;
        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        document.extract_text(&pages).map_err(extraction_error)
    }
}

fn extraction_error(err: lopdf::Error) -> FomcError {
    FomcError::Extraction {
        locator: "<pdf bytes>".to_string(),
        source: Box::new(err),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory collaborators for exercising discovery and fetching offline.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned bodies by URL and records every request in order.
    #[derive(Debug, Default)]
    pub struct StaticSource {
        pages: HashMap<String, Vec<u8>>,
        delays: HashMap<String, Duration>,
        fallback: Option<Vec<u8>>,
        requests: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl StaticSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.pages.insert(url.to_string(), body.into());
            self
        }

        /// Serve `url` only after sleeping for `delay`.
        pub fn delay(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.to_string(), delay);
            self
        }

        /// Body returned for any URL without a canned page.
        pub fn fallback(mut self, body: impl Into<Vec<u8>>) -> Self {
            self.fallback = Some(body.into());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        /// Highest number of fetches that were in progress at the same time.
        pub fn peak_in_flight(&self) -> usize {
            self.peak_in_flight.load(Ordering::SeqCst)
        }
    }

    impl PageSource for StaticSource {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FomcError> {
            self.requests.lock().unwrap().push(url.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }
            let result = match self.pages.get(url).or(self.fallback.as_ref()) {
                Some(body) => Ok(body.clone()),
                None => Err(FomcError::fetch(url, "404 Not Found")),
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    /// Treats the PDF bytes as UTF-8 text, or fails on demand.
    #[derive(Debug, Default)]
    pub struct EchoExtractor {
        pub fail: bool,
    }

    impl PdfTextExtractor for EchoExtractor {
        fn extract_text(&self, bytes: &[u8]) -> Result<String, FomcError> {
            if self.fail {
                return Err(FomcError::Extraction {
                    locator: "<pdf bytes>".to_string(),
                    source: "corrupt xref table".into(),
                });
            }
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
