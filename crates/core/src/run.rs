// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The synchronization pipeline.
//!
//! One run goes: load prior state, crawl every listing, deduplicate,
//! reconcile, build output, write every requested format, save state.
//! State is saved last and only when everything before it succeeded, so a
//! failed or cancelled run leaves the prior state as it was.

use crate::config::{ListingFailurePolicy, OutputFormat, SourceListing, SyncConfig, SyncMode};
use crate::dedup::Deduplicator;
use crate::error::CoreError;
use crate::output::{OutputPlan, OutputRecord, build_output};
use crate::pagination::{FieldExtractor, PageFetcher, PaginationCursor, RawPage};
use crate::reconcile::{ReconciliationResult, reconcile};
use crate::sink::OutputSink;
use crate::state::{PersistedState, RunSnapshot};
use crate::store::{StateStore, StoreError};
use epc_sync_domain::{CertificateRecord, RecordIssue, normalize_record, validate_record};
use futures::StreamExt;
use futures::stream;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Counters describing a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub mode: SyncMode,
    /// Listings configured for the run.
    pub listings: usize,
    /// Labels of listings dropped under the skip policy.
    pub failed_listings: Vec<String>,
    pub pages_fetched: u64,
    /// Raw records produced by extraction.
    pub raw_records: usize,
    /// Raw records that failed normalization.
    pub dropped_records: usize,
    /// Data quality issues found on kept records.
    pub quality_issues: usize,
    /// Records collapsed into an earlier occurrence of the same id.
    pub duplicates_merged: usize,
    pub new: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
    /// Stored ids missing from a run with failed listings. They may belong
    /// to a listing that was not crawled, so they are neither reported as
    /// removed nor tombstoned.
    pub unconfirmed_removals: usize,
    pub tombstones: usize,
    pub output_records: usize,
    /// Whether the run replaced the persisted state.
    pub state_saved: bool,
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} run: {} new, {} updated, {} unchanged, {} removed ({} records emitted)",
            self.mode, self.new, self.updated, self.unchanged, self.removed, self.output_records
        )?;
        if self.unconfirmed_removals > 0 {
            write!(f, ", {} missing ids not confirmed", self.unconfirmed_removals)?;
        }
        Ok(())
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RunReport,
    pub snapshot: RunSnapshot,
    pub reconciliation: ReconciliationResult,
    pub output: Vec<OutputRecord>,
}

/// The merged result of crawling every listing.
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    pub snapshot: RunSnapshot,
    pub failed_listings: Vec<String>,
    pub pages_fetched: u64,
    pub raw_records: usize,
    pub dropped_records: usize,
    pub quality_issues: usize,
    pub duplicates_merged: usize,
}

#[derive(Debug)]
struct ListingCrawl {
    snapshot: RunSnapshot,
    pages: u64,
    raw_records: usize,
    dropped: usize,
    quality_issues: usize,
    duplicates: usize,
}

/// Drives synchronization runs for one configuration.
pub struct Synchronizer<'a> {
    config: &'a SyncConfig,
    fetcher: &'a dyn PageFetcher,
    extractor: &'a dyn FieldExtractor,
}

impl<'a> Synchronizer<'a> {
    #[must_use]
    pub const fn new(
        config: &'a SyncConfig,
        fetcher: &'a dyn PageFetcher,
        extractor: &'a dyn FieldExtractor,
    ) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    /// Performs one complete run.
    ///
    /// # Arguments
    ///
    /// * `store` - Holds the state between runs, already locked for this run
    /// * `sink` - Receives the annotated output
    /// * `formats` - Formats to write, in order
    /// * `run_at` - Timestamp of the run, used as `fetchedAt` and as the
    ///   expiry reference time
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The state store cannot be read, or the stored state is corrupt in
    ///   monitoring mode
    /// - A listing fails under the abort policy
    /// - A sink fails
    /// - The new state cannot be saved
    ///
    /// On error the persisted state is unchanged.
    pub async fn run(
        &self,
        store: &mut dyn StateStore,
        sink: &mut dyn OutputSink,
        formats: &[OutputFormat],
        run_at: OffsetDateTime,
    ) -> Result<RunOutcome, CoreError> {
        self.config.validate()?;
        info!(
            mode = %self.config.mode,
            listings = self.config.source_listings.len(),
            "Starting synchronization run"
        );

        let prior: Option<PersistedState> = self.load_prior(store)?;
        let crawl: CrawlSummary = self.crawl(run_at).await?;

        // Full scrape classifies against nothing; the prior state is only
        // replaced.
        let baseline: Option<&PersistedState> = match self.config.mode {
            SyncMode::FullScrape => None,
            SyncMode::Monitoring => prior.as_ref(),
        };
        let mut reconciliation: ReconciliationResult = reconcile(&crawl.snapshot, baseline);
        let unconfirmed_removals: usize = if crawl.failed_listings.is_empty() {
            0
        } else {
            let withheld: usize = reconciliation.withhold_removals().len();
            if withheld > 0 {
                warn!(withheld, "Not reporting removals while listings failed to crawl");
            }
            withheld
        };

        let plan: OutputPlan = OutputPlan {
            mode: self.config.mode,
            include_tombstones: self.config.keep_removed_as_tombstones,
        };
        let output: Vec<OutputRecord> =
            build_output(&crawl.snapshot, baseline, &reconciliation, plan, run_at);

        for format in formats {
            sink.write(&output, *format)?;
            debug!(format = %format, records = output.len(), "Wrote output");
        }

        let state_saved: bool = if crawl.failed_listings.is_empty() {
            store.save(&crawl.snapshot)?;
            true
        } else {
            warn!(
                failed = ?crawl.failed_listings,
                "Snapshot is incomplete, keeping the previous state"
            );
            false
        };

        let report: RunReport = RunReport {
            mode: self.config.mode,
            listings: self.config.source_listings.len(),
            failed_listings: crawl.failed_listings,
            pages_fetched: crawl.pages_fetched,
            raw_records: crawl.raw_records,
            dropped_records: crawl.dropped_records,
            quality_issues: crawl.quality_issues,
            duplicates_merged: crawl.duplicates_merged,
            new: reconciliation.new.len(),
            updated: reconciliation.updated.len(),
            unchanged: reconciliation.unchanged.len(),
            removed: reconciliation.removed.len(),
            unconfirmed_removals,
            tombstones: output.iter().filter(|record| record.removed).count(),
            output_records: output.len(),
            state_saved,
        };
        info!(
            new = report.new,
            updated = report.updated,
            unchanged = report.unchanged,
            removed = report.removed,
            unconfirmed_removals = report.unconfirmed_removals,
            emitted = report.output_records,
            state_saved = report.state_saved,
            "Synchronization run complete"
        );

        Ok(RunOutcome {
            report,
            snapshot: crawl.snapshot,
            reconciliation,
            output,
        })
    }

    fn load_prior(&self, store: &mut dyn StateStore) -> Result<Option<PersistedState>, CoreError> {
        match store.load() {
            Ok(prior) => {
                debug!(
                    records = prior.as_ref().map_or(0, PersistedState::len),
                    "Loaded prior state"
                );
                Ok(prior)
            }
            Err(StoreError::Corrupt { reason }) if self.config.mode == SyncMode::FullScrape => {
                warn!(%reason, "Ignoring corrupt prior state for full scrape");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Crawls every configured listing and merges the results.
    ///
    /// Listings are crawled concurrently up to the configured limit, but
    /// merged strictly in configured order so dedup precedence does not
    /// depend on timing.
    ///
    /// # Errors
    ///
    /// Returns the first listing error under the abort policy.
    pub async fn crawl(&self, run_at: OffsetDateTime) -> Result<CrawlSummary, CoreError> {
        let mut summary: CrawlSummary = CrawlSummary::default();
        let mut merged: Deduplicator = Deduplicator::new(self.config.dedup_policy);

        let mut crawls = std::pin::pin!(
            stream::iter(self.config.source_listings.iter())
                .map(|listing| async move { (listing, self.crawl_listing(listing, run_at).await) })
                .buffered(self.config.listing_concurrency.max(1))
        );

        while let Some((listing, result)) = crawls.next().await {
            match result {
                Ok(crawl) => {
                    info!(
                        listing = %listing.label,
                        pages = crawl.pages,
                        records = crawl.snapshot.len(),
                        "Crawled listing"
                    );
                    summary.pages_fetched += crawl.pages;
                    summary.raw_records += crawl.raw_records;
                    summary.dropped_records += crawl.dropped;
                    summary.quality_issues += crawl.quality_issues;
                    summary.duplicates_merged += crawl.duplicates;
                    merged.absorb(crawl.snapshot);
                }
                Err(err) => match self.config.listing_failure {
                    ListingFailurePolicy::AbortRun => return Err(err),
                    ListingFailurePolicy::SkipListing => {
                        warn!(listing = %listing.label, error = %err, "Skipping failed listing");
                        summary.failed_listings.push(listing.label.clone());
                    }
                },
            }
        }

        summary.duplicates_merged += merged.duplicates();
        summary.snapshot = merged.finish();
        Ok(summary)
    }

    async fn crawl_listing(
        &self,
        listing: &SourceListing,
        run_at: OffsetDateTime,
    ) -> Result<ListingCrawl, CoreError> {
        let mut cursor = PaginationCursor::new(self.fetcher, listing, self.config.max_pages);
        let mut deduplicator: Deduplicator = Deduplicator::new(self.config.dedup_policy);
        let mut raw_records: usize = 0;
        let mut dropped: usize = 0;
        let mut quality_issues: usize = 0;

        while let Some(page) = cursor.next_page().await? {
            let records: Vec<CertificateRecord> =
                self.normalize_page(listing, &page, run_at, &mut raw_records, &mut dropped);
            for record in records {
                let issues: Vec<RecordIssue> = validate_record(&record);
                if !issues.is_empty() {
                    let summary: Vec<String> = issues.iter().map(ToString::to_string).collect();
                    debug!(id = %record.id(), issues = ?summary, "Record has quality issues");
                    quality_issues += issues.len();
                }
                deduplicator.push(record);
            }
        }

        Ok(ListingCrawl {
            pages: u64::from(cursor.pages_fetched()),
            raw_records,
            dropped,
            quality_issues,
            duplicates: deduplicator.duplicates(),
            snapshot: deduplicator.finish(),
        })
    }

    fn normalize_page(
        &self,
        listing: &SourceListing,
        page: &RawPage,
        run_at: OffsetDateTime,
        raw_records: &mut usize,
        dropped: &mut usize,
    ) -> Vec<CertificateRecord> {
        let mut records: Vec<CertificateRecord> = Vec::new();
        for raw in self.extractor.extract(page) {
            *raw_records += 1;
            match normalize_record(&raw, run_at) {
                Ok(record) => records.push(record),
                Err(err) => {
                    *dropped += 1;
                    warn!(
                        listing = %listing.label,
                        page = page.page,
                        field = err.field(),
                        error = %err,
                        "Dropping record that failed normalization"
                    );
                }
            }
        }
        records
    }
}
