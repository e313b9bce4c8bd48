// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Run configuration.
//!
//! All names serialize in camelCase so the same structures can be read
//! straight out of a JSON settings file.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default page limit per listing.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Default number of listings crawled at once.
pub const DEFAULT_LISTING_CONCURRENCY: usize = 4;

/// Whether a run emits everything or only what changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncMode {
    /// Emit every current record.
    #[default]
    FullScrape,
    /// Emit only new and updated records (plus tombstones).
    Monitoring,
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullScrape => write!(f, "fullScrape"),
            Self::Monitoring => write!(f, "monitoring"),
        }
    }
}

/// Which occurrence wins when an id is seen more than once in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DedupPolicy {
    /// The occurrence encountered last replaces earlier ones.
    #[default]
    LastWins,
    /// The occurrence encountered first is kept.
    FirstWins,
}

/// What a fetch failure inside one listing does to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListingFailurePolicy {
    /// Abort the whole run. Nothing is emitted and nothing is saved.
    #[default]
    AbortRun,
    /// Drop the failing listing and carry on. Output is still produced but
    /// state is not saved, since the snapshot is incomplete.
    SkipListing,
}

/// A listing page to crawl.
///
/// Deserializes from either a bare URL string or an object with `url` and
/// an optional `label`. The label defaults to the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SourceListingRepr")]
pub struct SourceListing {
    /// Absolute listing URL.
    pub url: String,
    /// Human-readable name used in logs and errors.
    pub label: String,
}

impl SourceListing {
    /// Creates a listing labelled with its own URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            label: url.clone(),
            url,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceListingRepr {
    Url(String),
    Detailed { url: String, label: Option<String> },
}

impl From<SourceListingRepr> for SourceListing {
    fn from(repr: SourceListingRepr) -> Self {
        match repr {
            SourceListingRepr::Url(url) => Self::new(url),
            SourceListingRepr::Detailed { url, label } => match label {
                Some(label) => Self::new(url).with_label(label),
                None => Self::new(url),
            },
        }
    }
}

/// Output formats a sink can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    #[serde(alias = "xlsx", alias = "xls")]
    Excel,
    Xml,
    Rss,
    Html,
}

impl OutputFormat {
    /// Every supported format.
    pub const ALL: [Self; 6] = [
        Self::Json,
        Self::Csv,
        Self::Excel,
        Self::Xml,
        Self::Rss,
        Self::Html,
    ];

    /// File extension conventionally used for the format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Excel => "xlsx",
            Self::Xml => "xml",
            Self::Rss => "rss",
            Self::Html => "html",
        }
    }

    /// The configuration name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Excel => "excel",
            Self::Xml => "xml",
            Self::Rss => "rss",
            Self::Html => "html",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted: String = value.trim().to_ascii_lowercase();
        if matches!(wanted.as_str(), "xlsx" | "xls") {
            return Ok(Self::Excel);
        }
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| CoreError::InvalidConfig {
                reason: format!("unknown output format '{value}'"),
            })
    }
}

/// Checks that a listing URL is an absolute http(s) URL with a host.
fn check_listing_url(raw: &str) -> Result<(), CoreError> {
    let invalid = |detail: &str| CoreError::InvalidConfig {
        reason: format!("listing URL '{raw}' is not an absolute http(s) URL: {detail}"),
    };

    let url: Url = Url::parse(raw.trim()).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(&format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(())
}

/// Configuration of one synchronization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// Listings to crawl. Their order decides dedup precedence across
    /// listings.
    pub source_listings: Vec<SourceListing>,
    #[serde(default)]
    pub mode: SyncMode,
    /// Emit removed ids as empty tombstone records.
    #[serde(default = "default_keep_tombstones")]
    pub keep_removed_as_tombstones: bool,
    /// Page limit per listing.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub dedup_policy: DedupPolicy,
    /// How many listings are crawled at once.
    #[serde(default = "default_listing_concurrency")]
    pub listing_concurrency: usize,
    #[serde(default)]
    pub listing_failure: ListingFailurePolicy,
}

const fn default_keep_tombstones() -> bool {
    true
}

const fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

const fn default_listing_concurrency() -> usize {
    DEFAULT_LISTING_CONCURRENCY
}

impl SyncConfig {
    /// Creates a full-scrape configuration with defaults for every knob.
    #[must_use]
    pub fn new(source_listings: Vec<SourceListing>) -> Self {
        Self {
            source_listings,
            mode: SyncMode::default(),
            keep_removed_as_tombstones: default_keep_tombstones(),
            max_pages: DEFAULT_MAX_PAGES,
            dedup_policy: DedupPolicy::default(),
            listing_concurrency: DEFAULT_LISTING_CONCURRENCY,
            listing_failure: ListingFailurePolicy::default(),
        }
    }

    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No listing is configured
    /// - A listing URL is not an absolute http(s) URL
    /// - `maxPages` or `listingConcurrency` is zero
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.source_listings.is_empty() {
            return Err(CoreError::InvalidConfig {
                reason: String::from("no source listings configured"),
            });
        }
        for listing in &self.source_listings {
            check_listing_url(&listing.url)?;
        }
        if self.max_pages == 0 {
            return Err(CoreError::InvalidConfig {
                reason: String::from("maxPages must be at least 1"),
            });
        }
        if self.listing_concurrency == 0 {
            return Err(CoreError::InvalidConfig {
                reason: String::from("listingConcurrency must be at least 1"),
            });
        }
        Ok(())
    }
}
