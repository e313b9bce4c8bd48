// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CoreError, DedupPolicy, ListingFailurePolicy, OutputFormat, SourceListing, SyncConfig,
    SyncMode,
};

#[test]
fn test_listing_accepts_bare_url_or_object() {
    let listings: Vec<SourceListing> = serde_json::from_str(
        r#"["https://example.com/a", {"url": "https://example.com/b", "label": "Bravo"}, {"url": "https://example.com/c"}]"#,
    )
    .unwrap();

    assert_eq!(listings[0].label, "https://example.com/a");
    assert_eq!(listings[1].label, "Bravo");
    assert_eq!(listings[2].label, "https://example.com/c");
}

#[test]
fn test_config_defaults_apply_when_omitted() {
    let config: SyncConfig =
        serde_json::from_str(r#"{"sourceListings": ["https://example.com/a"]}"#).unwrap();

    assert_eq!(config.mode, SyncMode::FullScrape);
    assert!(config.keep_removed_as_tombstones);
    assert_eq!(config.max_pages, 1000);
    assert_eq!(config.dedup_policy, DedupPolicy::LastWins);
    assert_eq!(config.listing_concurrency, 4);
    assert_eq!(config.listing_failure, ListingFailurePolicy::AbortRun);
}

#[test]
fn test_config_reads_camel_case_knobs() {
    let config: SyncConfig = serde_json::from_str(
        r#"{
            "sourceListings": ["https://example.com/a"],
            "mode": "monitoring",
            "keepRemovedAsTombstones": false,
            "maxPages": 5,
            "dedupPolicy": "firstWins",
            "listingConcurrency": 1,
            "listingFailure": "skipListing"
        }"#,
    )
    .unwrap();

    assert_eq!(config.mode, SyncMode::Monitoring);
    assert!(!config.keep_removed_as_tombstones);
    assert_eq!(config.max_pages, 5);
    assert_eq!(config.dedup_policy, DedupPolicy::FirstWins);
    assert_eq!(config.listing_failure, ListingFailurePolicy::SkipListing);
}

#[test]
fn test_validate_rejects_bad_configurations() {
    let empty: SyncConfig = SyncConfig::new(Vec::new());
    assert!(matches!(empty.validate(), Err(CoreError::InvalidConfig { .. })));

    let relative: SyncConfig = SyncConfig::new(vec![SourceListing::new("/search?page=1")]);
    assert!(matches!(relative.validate(), Err(CoreError::InvalidConfig { .. })));

    let mut zero_pages: SyncConfig = SyncConfig::new(vec![SourceListing::new("https://example.com")]);
    zero_pages.max_pages = 0;
    assert!(matches!(zero_pages.validate(), Err(CoreError::InvalidConfig { .. })));

    let valid: SyncConfig = SyncConfig::new(vec![SourceListing::new("https://example.com")]);
    assert!(valid.validate().is_ok());
}

#[test]
fn test_validate_rejects_unparseable_listing_urls() {
    for url in [
        "https://",
        "http://exa mple.com/search?postcode=AB1",
        "https://[bad",
        "ftp://example.com/search",
    ] {
        let config: SyncConfig = SyncConfig::new(vec![
            SourceListing::new("https://example.com/search?postcode=AB1"),
            SourceListing::new(url),
        ]);

        let result = config.validate();

        assert!(
            matches!(result, Err(CoreError::InvalidConfig { ref reason }) if reason.contains(url)),
            "{url} should be rejected, got {result:?}"
        );
    }
}

#[test]
fn test_output_format_names_and_extensions() {
    assert_eq!("EXCEL".parse::<OutputFormat>().unwrap(), OutputFormat::Excel);
    assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Excel);
    assert_eq!(
        serde_json::from_str::<OutputFormat>("\"xlsx\"").unwrap(),
        OutputFormat::Excel
    );
    assert_eq!(OutputFormat::Excel.extension(), "xlsx");
    assert_eq!(OutputFormat::Rss.extension(), "rss");
    assert!("pdf".parse::<OutputFormat>().is_err());
}
