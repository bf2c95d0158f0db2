//! Run configuration.
//!
//! Values are resolved in three layers: built-in defaults, an optional YAML
//! file passed with `--config`, then CLI flags and their environment
//! variables. The resolved [`FomcConfig`] is passed by reference to every
//! stage; no stage keeps its own copy of mutable state.

use crate::errors::FomcError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use url::Url;

/// What the fetch stage does when one task fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// First failure aborts the whole batch.
    #[default]
    Abort,
    /// Failed slots are logged and dropped; the rest of the batch completes.
    Isolate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FomcConfig {
    /// Site root that locators are resolved against.
    pub base_url: String,
    /// Live meeting calendar page.
    pub calendar_url: String,
    /// Root of the yearly speech archive pages.
    pub speech_base_url: String,
    /// Last year covered by the per-year `fomchistorical` pages.
    pub historical_date_statement: i32,
    /// Last year served by the legacy `{year}speech.htm` archive scheme.
    pub historical_date_speech: i32,
    /// Earliest year the speech archive exists for.
    pub speech_archive_floor: i32,
    /// Concurrency ceiling for the fetch stage.
    pub max_threads: usize,
    /// Root directory for the dataset, text files and script PDFs.
    pub base_dir: PathBuf,
    /// First year to discover from.
    pub from_year: i32,
    pub user_agent: String,
    /// Per-request timeout. `None` keeps requests unbounded.
    pub timeout_secs: Option<u64>,
    pub failure_policy: FailurePolicy,
}

impl Default for FomcConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.federalreserve.gov".to_string(),
            calendar_url: "https://www.federalreserve.gov/monetarypolicy/fomccalendars.htm"
                .to_string(),
            speech_base_url: "https://www.federalreserve.gov/newsevents/speech".to_string(),
            historical_date_statement: 2014,
            historical_date_speech: 2010,
            speech_archive_floor: 1996,
            max_threads: 10,
            base_dir: PathBuf::from("../data/FOMC/"),
            from_year: 1990,
            user_agent: concat!("fomc_corpus/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl FomcConfig {
    /// Load defaults, overlaid with the YAML file at `path` when one is given.
    #[instrument(level = "info", skip_all, fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> Result<Self, FomcError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    FomcError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                let config: FomcConfig = serde_yaml::from_str(&raw)?;
                info!("Loaded configuration file");
                config
            }
            None => FomcConfig::default(),
        };
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), FomcError> {
        if self.max_threads == 0 {
            return Err(FomcError::Config("max_threads must be at least 1".to_string()));
        }
        for (name, value) in [
            ("base_url", &self.base_url),
            ("calendar_url", &self.calendar_url),
            ("speech_base_url", &self.speech_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| FomcError::Config(format!("{name} '{value}' is not a URL: {e}")))?;
        }
        Ok(())
    }

    /// Site root as a parsed URL, for resolving locators.
    pub fn base(&self) -> Result<Url, FomcError> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Per-year archive page for statements, minutes and scripts.
    pub fn historical_url(&self, year: i32) -> String {
        format!(
            "{}/monetarypolicy/fomchistorical{}.htm",
            self.base_url.trim_end_matches('/'),
            year
        )
    }

    /// Legacy-scheme speech archive page, used through `historical_date_speech`.
    pub fn legacy_speech_url(&self, year: i32) -> String {
        format!("{}/{}speech.htm", self.speech_base_url.trim_end_matches('/'), year)
    }

    /// Modern-scheme speech archive page, used after `historical_date_speech`.
    pub fn modern_speech_url(&self, year: i32) -> String {
        format!("{}/{}-speeches.htm", self.speech_base_url.trim_end_matches('/'), year)
    }

    /// Where downloaded press-conference PDFs are kept.
    pub fn script_pdf_dir(&self) -> PathBuf {
        self.base_dir.join("script_pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_layout() {
        let config = FomcConfig::default();
        assert_eq!(config.historical_date_statement, 2014);
        assert_eq!(config.historical_date_speech, 2010);
        assert_eq!(config.speech_archive_floor, 1996);
        assert_eq!(config.max_threads, 10);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert!(config.timeout_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_archive_urls() {
        let config = FomcConfig::default();
        assert_eq!(
            config.historical_url(2009),
            "https://www.federalreserve.gov/monetarypolicy/fomchistorical2009.htm"
        );
        assert_eq!(
            config.legacy_speech_url(1999),
            "https://www.federalreserve.gov/newsevents/speech/1999speech.htm"
        );
        assert_eq!(
            config.modern_speech_url(2021),
            "https://www.federalreserve.gov/newsevents/speech/2021-speeches.htm"
        );
    }

    #[test]
    fn test_yaml_overrides_only_given_fields() {
        let yaml = "max_threads: 4\nfailure_policy: isolate\nbase_dir: /tmp/fomc\n";
        let config: FomcConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.max_threads, 4);
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
        assert_eq!(config.base_dir, PathBuf::from("/tmp/fomc"));
        assert_eq!(config.historical_date_statement, 2014);
        assert_eq!(config.script_pdf_dir(), PathBuf::from("/tmp/fomc/script_pdf"));
    }

    #[test]
    fn test_load_reads_yaml_file() {
        let dir = std::env::temp_dir().join(format!("fomc_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(&path, "from_year: 2012\ntimeout_secs: 30\n").unwrap();

        let config = FomcConfig::load(Some(&path)).unwrap();
        assert_eq!(config.from_year, 2012);
        assert_eq!(config.timeout_secs, Some(30));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = FomcConfig::load(Some(Path::new("/nonexistent/fomc.yaml"))).unwrap_err();
        assert!(matches!(err, FomcError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let config = FomcConfig {
            max_threads: 0,
            ..FomcConfig::default()
        };
        assert!(matches!(config.validate(), Err(FomcError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = FomcConfig {
            calendar_url: "not a url".to_string(),
            ..FomcConfig::default()
        };
        assert!(matches!(config.validate(), Err(FomcError::Config(_))));
    }
}
