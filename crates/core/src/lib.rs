// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Incremental synchronization engine.
//!
//! Crawls paginated certificate listings through a [`PageFetcher`], turns
//! pages into records with a [`FieldExtractor`], and reconciles the result
//! against the state persisted by the previous run. Transport, storage and
//! output are all behind traits; this crate performs no I/O of its own.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod config;
mod dedup;
mod error;
mod output;
mod pagination;
mod reconcile;
mod run;
mod sink;
mod state;
mod store;

#[cfg(test)]
mod tests;

pub use config::{
    DEFAULT_LISTING_CONCURRENCY, DEFAULT_MAX_PAGES, DedupPolicy, ListingFailurePolicy,
    OutputFormat, SourceListing, SyncConfig, SyncMode,
};
pub use dedup::{Deduplicator, MergeOutcome, deduplicate};
pub use error::CoreError;
pub use output::{OutputPlan, OutputRecord, build_output};
pub use pagination::{
    FetchFailure, FieldExtractor, PageFetch, PageFetcher, PaginationCursor, RawDocument, RawPage,
};
pub use reconcile::{ChangeKind, ReconciliationResult, materialize_tombstones, reconcile};
pub use run::{CrawlSummary, RunOutcome, RunReport, Synchronizer};
pub use sink::{OutputSink, SinkError};
pub use state::{PersistedState, RunSnapshot};
pub use store::{StateStore, StoreError};
