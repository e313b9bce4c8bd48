// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    FetchFailure, FieldExtractor, OutputFormat, OutputRecord, OutputSink, PageFetch, PageFetcher,
    PersistedState, RawDocument, RawPage, RunSnapshot, SinkError, SourceListing, StateStore,
    StoreError,
};
use async_trait::async_trait;
use epc_sync_domain::{CertificateRecord, RawRecord, keys, normalize_record};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::datetime;

pub const TEST_BASE_URL: &str = "https://find-energy-certificate.service.gov.uk";

pub fn create_test_run_at() -> OffsetDateTime {
    datetime!(2026-03-01 09:30 UTC)
}

pub fn create_test_listing(name: &str) -> SourceListing {
    SourceListing::new(format!("{TEST_BASE_URL}/find-a-certificate/search?postcode={name}"))
        .with_label(name)
}

/// A certificate document whose body lists `key=value` lines.
pub fn create_test_document(id: &str, rating: &str) -> RawDocument {
    create_test_document_with(id, &[(keys::RATING, rating)])
}

pub fn create_test_document_with(id: &str, fields: &[(&str, &str)]) -> RawDocument {
    let mut body: String = format!(
        "{}={id}\n{}=1 Test Road\n{}=AB1 2CD\n",
        keys::ID,
        keys::ADDRESS,
        keys::POST_CODE
    );
    for (key, value) in fields {
        body.push_str(&format!("{key}={value}\n"));
    }
    RawDocument {
        url: format!("{TEST_BASE_URL}/energy-certificate/{id}"),
        body,
    }
}

pub fn create_test_record(id: &str, rating: &str) -> CertificateRecord {
    let document: RawDocument = create_test_document(id, rating);
    let raw: RawRecord = parse_document(&document);
    normalize_record(&raw, create_test_run_at()).unwrap()
}

fn parse_document(document: &RawDocument) -> RawRecord {
    let mut raw: RawRecord = RawRecord::new().with_field(keys::URL, document.url.clone());
    for line in document.body.lines() {
        if let Some((key, value)) = line.split_once('=') {
            raw.set(key, value);
        }
    }
    raw
}

/// Reads the `key=value` documents produced by the helpers above.
pub struct LineExtractor;

impl FieldExtractor for LineExtractor {
    fn extract(&self, page: &RawPage) -> Vec<RawRecord> {
        page.documents.iter().map(parse_document).collect()
    }
}

#[derive(Debug, Clone)]
pub enum ScriptedPage {
    Documents(Vec<RawDocument>),
    Fail(String),
}

#[derive(Debug, Clone, Default)]
struct ListingScript {
    pages: Vec<ScriptedPage>,
    endless: bool,
    delay: Option<Duration>,
}

/// A fetcher that replays scripted pages per listing URL.
///
/// Pages past the end of a script report the end of the listing. Every call
/// is recorded.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    scripts: HashMap<String, ListingScript>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, listing: &SourceListing, pages: Vec<ScriptedPage>) -> Self {
        self.scripts.entry(listing.url.clone()).or_default().pages = pages;
        self
    }

    /// Every page announces a following page.
    pub fn with_endless(mut self, listing: &SourceListing, documents: Vec<RawDocument>) -> Self {
        let script: &mut ListingScript = self.scripts.entry(listing.url.clone()).or_default();
        script.pages = vec![ScriptedPage::Documents(documents)];
        script.endless = true;
        self
    }

    pub fn with_delay(mut self, listing: &SourceListing, delay: Duration) -> Self {
        self.scripts.entry(listing.url.clone()).or_default().delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, listing_url: &str, page: u32) -> Result<PageFetch, FetchFailure> {
        self.calls
            .lock()
            .unwrap()
            .push((listing_url.to_string(), page));

        let Some(script) = self.scripts.get(listing_url) else {
            return Ok(PageFetch::EndOfListing);
        };
        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }

        let index: usize = (page - 1) as usize;
        let scripted: Option<&ScriptedPage> = if script.endless {
            script.pages.first()
        } else {
            script.pages.get(index)
        };

        match scripted {
            None => Ok(PageFetch::EndOfListing),
            Some(ScriptedPage::Fail(reason)) => Err(FetchFailure::new(reason.clone())),
            Some(ScriptedPage::Documents(documents)) => Ok(PageFetch::Page(RawPage {
                listing_url: listing_url.to_string(),
                page,
                documents: documents.clone(),
                has_next: script.endless || index + 1 < script.pages.len(),
            })),
        }
    }
}

/// In-memory store that can be told to report corruption.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub state: Option<PersistedState>,
    pub corrupt: bool,
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn corrupt() -> Self {
        Self {
            corrupt: true,
            ..Self::default()
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&mut self) -> Result<Option<PersistedState>, StoreError> {
        if self.corrupt {
            return Err(StoreError::Corrupt {
                reason: String::from("unexpected end of file"),
            });
        }
        Ok(self.state.clone())
    }

    fn save(&mut self, snapshot: &RunSnapshot) -> Result<(), StoreError> {
        self.state = Some(PersistedState::from_snapshot(snapshot));
        self.corrupt = false;
        self.saves += 1;
        Ok(())
    }
}

/// Sink that keeps every write, or fails on demand.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub writes: Vec<(OutputFormat, Vec<OutputRecord>)>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn last_ids(&self) -> Vec<String> {
        self.writes
            .last()
            .map(|(_, records)| {
                records
                    .iter()
                    .map(|record| record.record.id().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl OutputSink for RecordingSink {
    fn write(&mut self, records: &[OutputRecord], format: OutputFormat) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::new(format, "disk full"));
        }
        self.writes.push((format, records.to_vec()));
        Ok(())
    }
}
