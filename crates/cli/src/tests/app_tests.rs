// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::app::run_with;
use crate::config::AppConfig;
use crate::tests::create_test_file;
use epc_sync::{ListingFailurePolicy, OutputFormat, RunReport};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const LISTING_PAGE: &str = r#"<html><body>
<a href="/energy-certificate/0001-0000-0000-0000-0001">1 High Street</a>
<a href="/energy-certificate/0002-0000-0000-0000-0002">2 High Street</a>
<nav class="govuk-pagination"></nav>
</body></html>"#;

fn certificate_page(address: &str, rating: &str) -> String {
    format!(
        "<html><body><dl><dt>Address</dt><dd>{address}</dd>\
         <dt>Postcode</dt><dd>AB1 2CD</dd>\
         <dt>Expiry date</dt><dd>1 May 2099</dd></dl>\
         <div class=\"epc-rating\">{rating}</div></body></html>"
    )
}

/// Serves fixed pages on a loopback port and returns the base URL.
async fn serve(pages: HashMap<String, String>) -> String {
    let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base: String = format!("http://{}", listener.local_addr().unwrap());
    let pages: Arc<HashMap<String, String>> = Arc::new(pages);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let pages = Arc::clone(&pages);
            tokio::spawn(async move {
                let mut buffer: Vec<u8> = vec![0; 8192];
                let read: usize = socket.read(&mut buffer).await.unwrap_or(0);
                let request: String = String::from_utf8_lossy(&buffer[..read]).into_owned();
                let target: &str = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body): (&str, &str) = pages
                    .get(target)
                    .map_or(("404 Not Found", ""), |body| ("200 OK", body.as_str()));
                let response: String = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    base
}

fn create_test_config(dir: &Path, listing_url: &str) -> AppConfig {
    let input: PathBuf = create_test_file(
        dir,
        "input.json",
        &format!(r#"{{"listingUrls": ["{listing_url}"]}}"#),
    );
    AppConfig {
        input_file: input,
        output_dir: dir.join("out"),
        state_file: dir.join("state").join("epc_state.json"),
        formats: vec![OutputFormat::Json, OutputFormat::Csv],
        request_delay_seconds: 0.0,
        retry_pause_seconds: 0.0,
        fetch_retries: 0,
        timeout_seconds: 5.0,
        ..AppConfig::default()
    }
}

fn read_output(config: &AppConfig) -> Vec<Value> {
    let text: String = fs::read_to_string(config.output_dir.join("epc_results.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn test_full_scrape_then_monitoring() {
    let dir: TempDir = TempDir::new().unwrap();
    let mut pages: HashMap<String, String> = HashMap::new();
    pages.insert(String::from("/search"), String::from(LISTING_PAGE));
    pages.insert(
        String::from("/energy-certificate/0001-0000-0000-0000-0001"),
        certificate_page("1 High Street", "70 C"),
    );
    pages.insert(
        String::from("/energy-certificate/0002-0000-0000-0000-0002"),
        certificate_page("2 High Street", "55 D"),
    );
    let base: String = serve(pages).await;
    let mut config: AppConfig = create_test_config(dir.path(), &format!("{base}/search"));
    config.base_url.clone_from(&base);

    let first: RunReport = run_with(&config).await.unwrap();

    assert_eq!(first.new, 2);
    assert!(first.state_saved);
    let output: Vec<Value> = read_output(&config);
    assert_eq!(output.len(), 2);
    assert_eq!(output[0]["id"], "0001-0000-0000-0000-0001");
    assert_eq!(output[0]["change"], "new");
    assert_eq!(output[0]["expired"], false);
    assert!(config.output_dir.join("epc_results.csv").exists());
    assert!(config.state_file.exists());
    // The lock is released once the run is over.
    assert!(!dir.path().join("state").join("epc_state.json.lock").exists());

    config.monitoring = true;
    let second: RunReport = run_with(&config).await.unwrap();

    assert_eq!(second.unchanged, 2);
    assert_eq!(second.output_records, 0);
    assert!(read_output(&config).is_empty());
}

#[tokio::test]
async fn test_unreachable_listing_leaves_state_untouched() {
    let dir: TempDir = TempDir::new().unwrap();
    let config: AppConfig = create_test_config(dir.path(), "http://127.0.0.1:1/search");

    let result = run_with(&config).await;

    assert!(result.is_err());
    assert!(!config.state_file.exists());
    assert!(!config.output_dir.join("epc_results.json").exists());
    assert!(!dir.path().join("state").join("epc_state.json.lock").exists());
}

#[tokio::test]
async fn test_skipped_listing_writes_output_without_saving_state() {
    let dir: TempDir = TempDir::new().unwrap();
    let config: AppConfig = AppConfig {
        listing_failure: Some(ListingFailurePolicy::SkipListing),
        ..create_test_config(dir.path(), "http://127.0.0.1:1/search")
    };

    let report: RunReport = run_with(&config).await.unwrap();

    assert_eq!(report.failed_listings.len(), 1);
    assert!(!report.state_saved);
    assert!(read_output(&config).is_empty());
    assert!(!config.state_file.exists());
}

#[tokio::test]
async fn test_missing_input_fails_before_locking() {
    let dir: TempDir = TempDir::new().unwrap();
    let config: AppConfig = AppConfig {
        input_file: dir.path().join("missing.json"),
        ..create_test_config(dir.path(), "http://127.0.0.1:1/search")
    };

    let err = run_with(&config).await.unwrap_err();

    assert!(err.to_string().contains("input file not found"), "{err}");
    assert!(!dir.path().join("state").exists());
}
