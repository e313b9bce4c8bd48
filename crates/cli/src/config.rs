// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The JSON settings file and the listing input file it points at.

use crate::args::Args;
use epc_sync::{
    DedupPolicy, ListingFailurePolicy, OutputFormat, SourceListing, SyncConfig, SyncMode,
};
use epc_sync_source::{DEFAULT_BASE_URL, HttpSettings};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{kind} file not found: {}", .path.display())]
    NotFound { kind: &'static str, path: PathBuf },
    #[error("failed to read {kind} file {}: {reason}", .path.display())]
    Read {
        kind: &'static str,
        path: PathBuf,
        reason: String,
    },
    #[error("failed to parse {kind} file {}: {reason}", .path.display())]
    Parse {
        kind: &'static str,
        path: PathBuf,
        reason: String,
    },
    #[error("no listing URLs provided in {}", .path.display())]
    NoListings { path: PathBuf },
    #[error(transparent)]
    Run(#[from] epc_sync::CoreError),
    #[error("invalid setting '{setting}': {reason}")]
    Invalid {
        setting: &'static str,
        reason: String,
    },
}

fn default_input_file() -> PathBuf {
    PathBuf::from("data/sample_input.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_base_name() -> String {
    String::from("epc_results")
}

fn default_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Json]
}

fn default_state_file() -> PathBuf {
    PathBuf::from("data/epc_state.json")
}

const fn default_request_delay_seconds() -> f64 {
    0.2
}

const fn default_timeout_seconds() -> f64 {
    20.0
}

const fn default_fetch_retries() -> u32 {
    2
}

const fn default_retry_pause_seconds() -> f64 {
    1.0
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Application settings, read from `config/settings.json` by default.
///
/// Every key is optional. The run knobs at the end override the
/// corresponding [`SyncConfig`] defaults when present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_input_file")]
    pub input_file: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_base_name")]
    pub base_name: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,
    #[serde(default)]
    pub monitoring: bool,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_request_delay_seconds")]
    pub request_delay_seconds: f64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,
    #[serde(default = "default_fetch_retries")]
    pub fetch_retries: u32,
    #[serde(default = "default_retry_pause_seconds")]
    pub retry_pause_seconds: f64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub max_pages: Option<u32>,
    #[serde(default)]
    pub dedup_policy: Option<DedupPolicy>,
    #[serde(default)]
    pub keep_removed_as_tombstones: Option<bool>,
    #[serde(default)]
    pub listing_concurrency: Option<usize>,
    #[serde(default)]
    pub listing_failure: Option<ListingFailurePolicy>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_file: default_input_file(),
            output_dir: default_output_dir(),
            base_name: default_base_name(),
            formats: default_formats(),
            monitoring: false,
            state_file: default_state_file(),
            request_delay_seconds: default_request_delay_seconds(),
            timeout_seconds: default_timeout_seconds(),
            fetch_retries: default_fetch_retries(),
            retry_pause_seconds: default_retry_pause_seconds(),
            base_url: default_base_url(),
            max_pages: None,
            dedup_policy: None,
            keep_removed_as_tombstones: None,
            listing_concurrency: None,
            listing_failure: None,
        }
    }
}

/// The listing input file: a bare list, or an object keyed by
/// `sourceListings`, `listingUrls` or `urls`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingFile {
    Bare(Vec<SourceListing>),
    Keyed(KeyedListings),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyedListings {
    #[serde(default)]
    source_listings: Vec<SourceListing>,
    #[serde(default)]
    listing_urls: Vec<SourceListing>,
    #[serde(default)]
    urls: Vec<SourceListing>,
}

impl ListingFile {
    fn into_listings(self) -> Vec<SourceListing> {
        match self {
            Self::Bare(listings) => listings,
            Self::Keyed(keyed) => [keyed.source_listings, keyed.listing_urls, keyed.urls]
                .into_iter()
                .find(|listings| !listings.is_empty())
                .unwrap_or_default(),
        }
    }
}

fn read_file(kind: &'static str, path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                kind,
                path: path.to_path_buf(),
                reason: err.to_string(),
            }
        }
    })
}

fn seconds(setting: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|err| ConfigError::Invalid {
        setting,
        reason: err.to_string(),
    })
}

/// Reads the listing input file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, malformed, or
/// lists no listing.
pub fn load_listings(path: &Path) -> Result<Vec<SourceListing>, ConfigError> {
    let text: String = read_file("input", path)?;
    let file: ListingFile = serde_json::from_str(&text).map_err(|err| ConfigError::Parse {
        kind: "input",
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    let listings: Vec<SourceListing> = file.into_listings();
    if listings.is_empty() {
        return Err(ConfigError::NoListings {
            path: path.to_path_buf(),
        });
    }
    Ok(listings)
}

impl AppConfig {
    /// Loads settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text: String = read_file("config", path)?;
        serde_json::from_str(&text).map_err(|err| ConfigError::Parse {
            kind: "config",
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Applies command line overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(mode) = args.mode_override() {
            self.monitoring = mode == SyncMode::Monitoring;
        }
        if !args.formats.is_empty() {
            self.formats.clone_from(&args.formats);
        }
        if let Some(output_dir) = &args.output_dir {
            self.output_dir.clone_from(output_dir);
        }
        if let Some(state_file) = &args.state_file {
            self.state_file.clone_from(state_file);
        }
        if args.max_pages.is_some() {
            self.max_pages = args.max_pages;
        }
    }

    #[must_use]
    pub const fn mode(&self) -> SyncMode {
        if self.monitoring {
            SyncMode::Monitoring
        } else {
            SyncMode::FullScrape
        }
    }

    /// Requested formats in order, each at most once.
    #[must_use]
    pub fn output_formats(&self) -> Vec<OutputFormat> {
        let mut formats: Vec<OutputFormat> = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            if !formats.contains(format) {
                formats.push(*format);
            }
        }
        formats
    }

    /// Builds and validates the run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn sync_config(&self, listings: Vec<SourceListing>) -> Result<SyncConfig, ConfigError> {
        let mut config: SyncConfig = SyncConfig::new(listings);
        config.mode = self.mode();
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(policy) = self.dedup_policy {
            config.dedup_policy = policy;
        }
        if let Some(keep) = self.keep_removed_as_tombstones {
            config.keep_removed_as_tombstones = keep;
        }
        if let Some(concurrency) = self.listing_concurrency {
            config.listing_concurrency = concurrency;
        }
        if let Some(policy) = self.listing_failure {
            config.listing_failure = policy;
        }

        config.validate()?;
        Ok(config)
    }

    /// HTTP settings for the page fetcher.
    ///
    /// # Errors
    ///
    /// Returns an error if a duration is negative or not a number.
    pub fn http_settings(&self) -> Result<HttpSettings, ConfigError> {
        Ok(HttpSettings {
            base_url: self.base_url.clone(),
            timeout: seconds("timeoutSeconds", self.timeout_seconds)?,
            request_delay: seconds("requestDelaySeconds", self.request_delay_seconds)?,
            retries: self.fetch_retries,
            retry_pause: seconds("retryPauseSeconds", self.retry_pause_seconds)?,
            ..HttpSettings::default()
        })
    }
}
