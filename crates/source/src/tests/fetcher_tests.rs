// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::fixtures::{
    LISTING_EMPTY_PAGE, LISTING_FIRST_PAGE, LISTING_LAST_PAGE, create_test_certificate_page,
};
use crate::tests::server::{TestServer, ok};
use crate::{EpcFieldExtractor, HttpClient, HttpError, HttpPageFetcher, HttpSettings};
use epc_sync::{
    CrawlSummary, FetchFailure, PageFetch, PageFetcher, SourceListing, SyncConfig, Synchronizer,
};
use time::macros::datetime;

const SEARCH: &str = "/search?postcode=AB1";
const SEARCH_PAGE_2: &str = "/search?postcode=AB1&page=2";
const CERT_1: &str = "/energy-certificate/0001-0000-0000-0000-0001";
const CERT_2: &str = "/energy-certificate/0002-0000-0000-0000-0002";
const CERT_3: &str = "/energy-certificate/0003-0000-0000-0000-0003";

async fn create_test_register() -> TestServer {
    TestServer::start(vec![
        (SEARCH, ok(LISTING_FIRST_PAGE)),
        (SEARCH_PAGE_2, ok(LISTING_LAST_PAGE)),
        (CERT_1, ok(create_test_certificate_page("1 High Street"))),
        (CERT_2, ok(create_test_certificate_page("2 High Street"))),
        (CERT_3, ok(create_test_certificate_page("3 High Street"))),
    ])
    .await
}

fn create_test_fetcher(server: &TestServer) -> HttpPageFetcher {
    HttpPageFetcher::from_settings(server.settings()).unwrap()
}

fn expect_page(fetch: PageFetch) -> epc_sync::RawPage {
    match fetch {
        PageFetch::Page(page) => page,
        PageFetch::EndOfListing => panic!("expected a page, got end of listing"),
    }
}

#[tokio::test]
async fn test_fetch_downloads_linked_certificates() {
    let server: TestServer = create_test_register().await;
    let fetcher: HttpPageFetcher = create_test_fetcher(&server);

    let first = expect_page(fetcher.fetch(&server.url(SEARCH), 1).await.unwrap());
    let second = expect_page(fetcher.fetch(&server.url(SEARCH), 2).await.unwrap());

    assert_eq!(first.page, 1);
    assert!(first.has_next);
    let urls: Vec<&str> = first.documents.iter().map(|d| d.url.as_str()).collect();
    assert_eq!(urls, vec![server.url(CERT_1), server.url(CERT_2)]);
    assert!(first.documents[0].body.contains("1 High Street"));

    assert_eq!(second.page, 2);
    assert!(!second.has_next);
    assert_eq!(second.documents.len(), 1);
    // The duplicate link on page 1 is fetched once.
    assert_eq!(server.hits(CERT_1), 1);
}

#[tokio::test]
async fn test_page_without_links_ends_listing() {
    let server: TestServer = TestServer::start(vec![(SEARCH, ok(LISTING_EMPTY_PAGE))]).await;
    let fetcher: HttpPageFetcher = create_test_fetcher(&server);

    let fetch: PageFetch = fetcher.fetch(&server.url(SEARCH), 1).await.unwrap();

    assert_eq!(fetch, PageFetch::EndOfListing);
}

#[tokio::test]
async fn test_missing_later_page_ends_listing() {
    let server: TestServer = create_test_register().await;
    let fetcher: HttpPageFetcher = create_test_fetcher(&server);

    let fetch: PageFetch = fetcher.fetch(&server.url(SEARCH), 3).await.unwrap();

    assert_eq!(fetch, PageFetch::EndOfListing);
}

#[tokio::test]
async fn test_missing_first_page_is_a_failure() {
    let server: TestServer = TestServer::start(Vec::new()).await;
    let fetcher: HttpPageFetcher = create_test_fetcher(&server);

    let result: Result<PageFetch, FetchFailure> = fetcher.fetch(&server.url(SEARCH), 1).await;

    let failure: FetchFailure = result.unwrap_err();
    assert!(failure.reason.contains("404"), "{failure}");
}

#[tokio::test]
async fn test_gone_certificate_is_skipped() {
    let server: TestServer = TestServer::start(vec![
        (SEARCH, ok(LISTING_FIRST_PAGE)),
        (CERT_1, vec![(410, String::from("gone"))]),
        (CERT_2, ok(create_test_certificate_page("2 High Street"))),
    ])
    .await;
    let fetcher: HttpPageFetcher = create_test_fetcher(&server);

    let page = expect_page(fetcher.fetch(&server.url(SEARCH), 1).await.unwrap());

    assert_eq!(page.documents.len(), 1);
    assert_eq!(page.documents[0].url, server.url(CERT_2));
    // Not found is final, no retries.
    assert_eq!(server.hits(CERT_1), 1);
}

#[tokio::test]
async fn test_failing_certificate_fails_the_page() {
    let server: TestServer = TestServer::start(vec![
        (SEARCH, ok(LISTING_FIRST_PAGE)),
        (CERT_1, vec![(500, String::from("boom"))]),
        (CERT_2, ok(create_test_certificate_page("2 High Street"))),
    ])
    .await;
    let fetcher: HttpPageFetcher = create_test_fetcher(&server);

    let failure: FetchFailure = fetcher.fetch(&server.url(SEARCH), 1).await.unwrap_err();

    assert!(failure.reason.contains(CERT_1), "{failure}");
    // One attempt plus two retries.
    assert_eq!(server.hits(CERT_1), 3);
}

#[tokio::test]
async fn test_client_retries_unavailable_then_succeeds() {
    let server: TestServer = TestServer::start(vec![(
        CERT_1,
        vec![
            (503, String::from("busy")),
            (200, String::from("finally")),
        ],
    )])
    .await;
    let client: HttpClient = HttpClient::new(server.settings()).unwrap();

    let body: String = client.get_text(&server.url(CERT_1)).await.unwrap();

    assert_eq!(body, "finally");
    assert_eq!(server.hits(CERT_1), 2);
}

#[tokio::test]
async fn test_client_gives_up_after_retries() {
    let server: TestServer =
        TestServer::start(vec![(CERT_1, vec![(503, String::from("busy"))])]).await;
    let settings: HttpSettings = HttpSettings {
        retries: 1,
        ..server.settings()
    };
    let client: HttpClient = HttpClient::new(settings).unwrap();

    let err: HttpError = client.get_text(&server.url(CERT_1)).await.unwrap_err();

    assert!(matches!(err, HttpError::Status { status: 503, .. }));
    assert!(err.is_retryable());
    assert!(!err.is_not_found());
    assert_eq!(server.hits(CERT_1), 2);
}

#[tokio::test]
async fn test_client_does_not_retry_client_errors() {
    let server: TestServer = TestServer::start(Vec::new()).await;
    let client: HttpClient = HttpClient::new(server.settings()).unwrap();

    let err: HttpError = client.get_text(&server.url(CERT_1)).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(server.hits(CERT_1), 1);
}

#[tokio::test]
async fn test_crawl_over_http_collects_every_certificate() {
    let server: TestServer = create_test_register().await;
    let fetcher: HttpPageFetcher = create_test_fetcher(&server);
    let config: SyncConfig = SyncConfig::new(vec![SourceListing::new(server.url(SEARCH))]);
    let synchronizer: Synchronizer<'_> = Synchronizer::new(&config, &fetcher, &EpcFieldExtractor);

    let summary: CrawlSummary = synchronizer
        .crawl(datetime!(2026-03-01 08:00 UTC))
        .await
        .unwrap();

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.dropped_records, 0);
    assert!(summary.failed_listings.is_empty());
    let ids: Vec<&str> = summary.snapshot.ids().map(|id| id.value()).collect();
    assert_eq!(
        ids,
        vec![
            "0001-0000-0000-0000-0001",
            "0002-0000-0000-0000-0002",
            "0003-0000-0000-0000-0003",
        ]
    );
    // The last page carried no next link, so page 3 was never requested.
    assert_eq!(server.hits("/search?postcode=AB1&page=3"), 0);
}

#[tokio::test]
#[ignore = "talks to the live certificate register"]
async fn test_live_register_listing() {
    let fetcher: HttpPageFetcher = HttpPageFetcher::from_settings(HttpSettings::default()).unwrap();
    let listing: String = format!(
        "{}/find-a-certificate/search-by-postcode?postcode=SW1A+1AA",
        crate::DEFAULT_BASE_URL
    );

    let fetch: PageFetch = fetcher.fetch(&listing, 1).await.unwrap();

    if let PageFetch::Page(page) = fetch {
        assert!(page.documents.iter().all(|d| d.url.contains("/energy-certificate/")));
    }
}
