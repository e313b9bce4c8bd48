// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Listing pagination.
//!
//! A [`PaginationCursor`] walks the pages of one listing through a
//! [`PageFetcher`] until the listing ends or the page limit is reached.
//! Pages are numbered from 1.

use crate::config::SourceListing;
use crate::error::CoreError;
use async_trait::async_trait;
use epc_sync_domain::RawRecord;
use thiserror::Error;
use tracing::debug;

/// One certificate document fetched for a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// The URL the document was fetched from.
    pub url: String,
    /// The document body.
    pub body: String,
}

/// The documents behind one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// URL of the listing the page belongs to.
    pub listing_url: String,
    /// 1-based page number.
    pub page: u32,
    /// Certificate documents linked from the page, in page order.
    pub documents: Vec<RawDocument>,
    /// Whether the page announces a following page.
    pub has_next: bool,
}

/// Result of asking a fetcher for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFetch {
    /// The page exists.
    Page(RawPage),
    /// The listing has no page with this number.
    EndOfListing,
}

/// A page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct FetchFailure {
    /// Description of the failure.
    pub reason: String,
}

impl FetchFailure {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Retrieves listing pages.
///
/// Implementations own their transport concerns (timeouts, retries,
/// politeness delays) and report only the final outcome.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches page `page` of the listing at `listing_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be retrieved.
    async fn fetch(&self, listing_url: &str, page: u32) -> Result<PageFetch, FetchFailure>;
}

/// Turns a fetched page into raw records.
///
/// Extraction is total: a document that yields nothing contributes no
/// records, and missing fields are simply absent from the raw record.
pub trait FieldExtractor: Send + Sync {
    fn extract(&self, page: &RawPage) -> Vec<RawRecord>;
}

/// Walks one listing page by page.
///
/// The cursor stops after the fetcher reports the end of the listing or a
/// page without a following page. It never fetches more than `max_pages`
/// pages; a listing that still announces more pages at that point fails
/// with [`CoreError::PaginationOverrun`].
pub struct PaginationCursor<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    listing: &'a SourceListing,
    max_pages: u32,
    next: u32,
    finished: bool,
}

impl<'a, F: PageFetcher + ?Sized> PaginationCursor<'a, F> {
    #[must_use]
    pub const fn new(fetcher: &'a F, listing: &'a SourceListing, max_pages: u32) -> Self {
        Self {
            fetcher,
            listing,
            max_pages,
            next: 1,
            finished: false,
        }
    }

    /// Fetches the next page.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(page))` for each page of the listing, in order
    /// * `Ok(None)` once the listing has ended
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The fetcher fails for the page
    /// - The page limit is reached while the listing still announces more
    ///
    /// After an error the cursor is finished.
    pub async fn next_page(&mut self) -> Result<Option<RawPage>, CoreError> {
        if self.finished {
            return Ok(None);
        }
        if self.next > self.max_pages {
            self.finished = true;
            return Err(CoreError::PaginationOverrun {
                listing: self.listing.label.clone(),
                max_pages: self.max_pages,
            });
        }

        let page_number: u32 = self.next;
        match self.fetcher.fetch(&self.listing.url, page_number).await {
            Ok(PageFetch::Page(page)) => {
                debug!(
                    listing = %self.listing.label,
                    page = page_number,
                    documents = page.documents.len(),
                    has_next = page.has_next,
                    "Fetched listing page"
                );
                self.next += 1;
                if !page.has_next {
                    self.finished = true;
                }
                Ok(Some(page))
            }
            Ok(PageFetch::EndOfListing) => {
                debug!(listing = %self.listing.label, page = page_number, "End of listing");
                self.finished = true;
                Ok(None)
            }
            Err(failure) => {
                self.finished = true;
                Err(CoreError::PageFetch {
                    listing: self.listing.label.clone(),
                    page: page_number,
                    reason: failure.reason,
                })
            }
        }
    }

    /// Rewinds the cursor to page 1.
    pub const fn reset(&mut self) {
        self.next = 1;
        self.finished = false;
    }

    /// Number of pages successfully fetched since the last reset.
    #[must_use]
    pub const fn pages_fetched(&self) -> u32 {
        self.next - 1
    }
}
