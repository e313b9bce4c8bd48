// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Listing page parsing.
//!
//! A listing page is a search result page that links to certificate pages.
//! Certificate links are recognised by the `/energy-certificate/` path
//! segment. Pages are addressed with a 1-based `page` query parameter.

use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Path segment that marks a certificate link.
pub const CERTIFICATE_PATH: &str = "/energy-certificate/";

#[allow(clippy::expect_used)] // literal selector
static LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector parses"));

#[allow(clippy::expect_used)] // literal selector
static PAGINATION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".govuk-pagination, nav.pagination, [aria-label=\"Pagination\"]")
        .expect("pagination selector parses")
});

#[allow(clippy::expect_used)] // literal selector
static NEXT_CONTAINER_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".govuk-pagination__next a[href], a.govuk-pagination__next[href]")
        .expect("pagination selector parses")
});

/// Builds the URL of page `page` of a listing.
///
/// Page 1 of a listing without a `page` parameter is the listing URL
/// itself. Otherwise any existing `page` parameter is replaced.
///
/// # Errors
///
/// Returns an error if `listing_url` is not an absolute URL.
pub fn page_url(listing_url: &str, page: u32) -> Result<String, url::ParseError> {
    let mut url: Url = Url::parse(listing_url)?;
    let has_page: bool = url.query_pairs().any(|(key, _)| key == "page");
    if page == 1 && !has_page {
        return Ok(url.into());
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("page", &page.to_string());
    Ok(url.into())
}

/// Resolves a certificate href.
///
/// Absolute hrefs are kept, root-relative ones are joined to `base_url`,
/// anything else is joined to the page it was found on.
fn resolve_link(href: &str, page_url: &Url, base_url: &Url) -> Option<String> {
    let href: &str = href.trim();
    let resolved: Url = if href.starts_with("http://") || href.starts_with("https://") {
        Url::parse(href).ok()?
    } else if href.starts_with('/') {
        base_url.join(href).ok()?
    } else {
        page_url.join(href).ok()?
    };
    Some(resolved.into())
}

/// Text content of an element with whitespace runs collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Collects the certificate links of a listing page, de-duplicated and
/// sorted.
///
/// When no anchor qualifies, the page text is scanned for tokens carrying
/// the certificate path.
#[must_use]
pub fn parse_listing_links(html: &str, page_url: &str, base_url: &str) -> Vec<String> {
    let (Ok(page), Ok(base)) = (Url::parse(page_url), Url::parse(base_url)) else {
        return Vec::new();
    };
    let document: Html = Html::parse_document(html);

    let mut links: BTreeSet<String> = document
        .select(&LINKS)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.contains(CERTIFICATE_PATH))
        .filter_map(|href| resolve_link(href, &page, &base))
        .collect();

    if links.is_empty() {
        let text: String = element_text(document.root_element());
        links = text
            .split_whitespace()
            .filter_map(|token| token.find(CERTIFICATE_PATH).map(|start| &token[start..]))
            .filter_map(|href| resolve_link(href, &page, &base))
            .collect();
    }

    links.into_iter().collect()
}

fn has_next_link(document: &Html) -> bool {
    if document.select(&NEXT_CONTAINER_LINKS).next().is_some() {
        return true;
    }

    document.select(&LINKS).any(|anchor| {
        let rel_next: bool = anchor.value().attr("rel").is_some_and(|rel| {
            rel.split_whitespace()
                .any(|token| token.eq_ignore_ascii_case("next"))
        });
        let text: String = element_text(anchor).to_ascii_lowercase();
        rel_next || text == "next" || text.starts_with("next page")
    })
}

/// Whether a listing page says it is the last one.
///
/// Only a page carrying pagination markup without a "next" link counts as
/// last. A page without any pagination markup is not known to be last, so
/// the caller keeps paging until a page comes back empty.
#[must_use]
pub fn is_last_page(html: &str) -> bool {
    let document: Html = Html::parse_document(html);
    document.select(&PAGINATION).next().is_some() && !has_next_link(&document)
}

/// Reads the certificate id from a certificate URL.
#[must_use]
pub fn certificate_id_from_url(url: &str) -> Option<String> {
    let parsed: Url = Url::parse(url).ok()?;
    let path: &str = parsed.path();
    let start: usize = path.find(CERTIFICATE_PATH)? + CERTIFICATE_PATH.len();
    let id: &str = path[start..].trim_matches('/');
    let id: &str = id.split('/').next().unwrap_or(id);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
