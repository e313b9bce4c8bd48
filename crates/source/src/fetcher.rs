// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::client::{HttpClient, HttpError, HttpSettings};
use crate::listing::{is_last_page, page_url, parse_listing_links};
use async_trait::async_trait;
use epc_sync::{FetchFailure, PageFetch, PageFetcher, RawDocument, RawPage};
use tracing::{debug, warn};

/// Fetches listing pages and the certificate pages they link to over HTTP.
///
/// A listing page without certificate links ends the listing, as does a
/// missing page past the first. A certificate that is gone (404 or 410) is
/// skipped; any other certificate failure fails the whole page so that a
/// partially read page is never mistaken for a complete one.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: HttpClient,
}

impl HttpPageFetcher {
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_settings(settings: HttpSettings) -> Result<Self, HttpError> {
        Ok(Self::new(HttpClient::new(settings)?))
    }

    async fn fetch_documents(&self, links: Vec<String>) -> Result<Vec<RawDocument>, FetchFailure> {
        let mut documents: Vec<RawDocument> = Vec::with_capacity(links.len());
        for link in links {
            match self.client.get_text(&link).await {
                Ok(body) => documents.push(RawDocument { url: link, body }),
                Err(err) if err.is_not_found() => {
                    warn!(url = %link, error = %err, "Certificate is gone, skipping");
                }
                Err(err) => {
                    return Err(FetchFailure::new(format!(
                        "certificate {link} could not be fetched: {err}"
                    )));
                }
            }
        }
        Ok(documents)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, listing_url: &str, page: u32) -> Result<PageFetch, FetchFailure> {
        let url: String = page_url(listing_url, page)
            .map_err(|e| FetchFailure::new(format!("invalid listing URL {listing_url}: {e}")))?;

        let html: String = match self.client.get_text(&url).await {
            Ok(html) => html,
            Err(err) if page > 1 && err.is_not_found() => {
                debug!(url, "Listing page not found, treating as end of listing");
                return Ok(PageFetch::EndOfListing);
            }
            Err(err) => return Err(FetchFailure::new(err.to_string())),
        };

        let links: Vec<String> = parse_listing_links(&html, &url, &self.client.settings().base_url);
        if links.is_empty() {
            debug!(url, "Listing page has no certificate links");
            return Ok(PageFetch::EndOfListing);
        }

        let has_next: bool = !is_last_page(&html);
        debug!(url, links = links.len(), has_next, "Parsed listing page");
        let documents: Vec<RawDocument> = self.fetch_documents(links).await?;

        Ok(PageFetch::Page(RawPage {
            listing_url: listing_url.to_string(),
            page,
            documents,
            has_next,
        }))
    }
}
