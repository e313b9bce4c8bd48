// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP source for the energy certificate register.
//!
//! Provides the [`PageFetcher`](epc_sync::PageFetcher) that walks listing
//! pages and downloads the certificates they link to, and the
//! [`FieldExtractor`](epc_sync::FieldExtractor) that reads certificate pages
//! into raw records.

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
#![allow(clippy::multiple_crate_versions)]

mod client;
mod extract;
mod fetcher;
mod listing;

#[cfg(test)]
mod tests;

pub use client::{DEFAULT_BASE_URL, HttpClient, HttpError, HttpSettings};
pub use extract::{EpcFieldExtractor, extract_certificate, text_after_label};
pub use fetcher::HttpPageFetcher;
pub use listing::{
    CERTIFICATE_PATH, certificate_id_from_url, is_last_page, page_url, parse_listing_links,
};
