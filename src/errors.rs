//! Error taxonomy for the discovery, fetch and assembly pipeline.
//!
//! Every stage returns [`FomcError`]. Nothing is retried or isolated by
//! default: an error raised anywhere terminates the run, and `main` logs it
//! together with the stage that produced it.

use thiserror::Error;

/// Boxed source error carried by transport and extraction failures.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum FomcError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("unsupported category '{0}': expected one of statement, minutes, script, speech")]
    UnsupportedCategory(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxedSource,
    },

    #[error("failed to parse {context}: {message}")]
    Parse { context: String, message: String },

    #[error("PDF text extraction failed for {locator}: {source}")]
    Extraction {
        locator: String,
        #[source]
        source: BoxedSource,
    },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("fetch task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl FomcError {
    pub fn fetch(url: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        FomcError::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        FomcError::Parse {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl From<serde_yaml::Error> for FomcError {
    fn from(err: serde_yaml::Error) -> Self {
        FomcError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_url() {
        let err = FomcError::fetch("https://example.com/a.htm", "connection reset");
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/a.htm"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_unsupported_category_lists_choices() {
        let err = FomcError::UnsupportedCategory("testimony".to_string());
        assert!(err.to_string().contains("statement, minutes, script, speech"));
    }

    #[test]
    fn test_yaml_error_maps_to_config() {
        let yaml: Result<serde_yaml::Value, _> = serde_yaml::from_str("key: [unterminated");
        let err: FomcError = yaml.unwrap_err().into();
        assert!(matches!(err, FomcError::Config(_)));
    }
}
