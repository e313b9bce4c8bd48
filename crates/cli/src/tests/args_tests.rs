// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::args::Args;
use clap::Parser;
use epc_sync::{OutputFormat, SyncMode};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[test]
fn test_defaults() {
    let args: Args = Args::try_parse_from(["epc-sync"]).unwrap();

    assert_eq!(args.config, PathBuf::from("config/settings.json"));
    assert_eq!(args.mode_override(), None);
    assert!(args.formats.is_empty());
    assert_eq!(args.log_level(), LevelFilter::INFO);
}

#[test]
fn test_mode_flags() {
    let full: Args = Args::try_parse_from(["epc-sync", "--full"]).unwrap();
    let monitor: Args = Args::try_parse_from(["epc-sync", "--monitor"]).unwrap();

    assert_eq!(full.mode_override(), Some(SyncMode::FullScrape));
    assert_eq!(monitor.mode_override(), Some(SyncMode::Monitoring));
}

#[test]
fn test_full_and_monitor_conflict() {
    assert!(Args::try_parse_from(["epc-sync", "--full", "--monitor"]).is_err());
}

#[test]
fn test_repeated_formats_and_overrides() {
    let args: Args = Args::try_parse_from([
        "epc-sync",
        "-c",
        "other.json",
        "--format",
        "csv",
        "--format",
        "RSS",
        "--output-dir",
        "out",
        "--state-file",
        "state.db",
        "--max-pages",
        "5",
        "-v",
    ])
    .unwrap();

    assert_eq!(args.config, PathBuf::from("other.json"));
    assert_eq!(args.formats, vec![OutputFormat::Csv, OutputFormat::Rss]);
    assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    assert_eq!(args.state_file, Some(PathBuf::from("state.db")));
    assert_eq!(args.max_pages, Some(5));
    assert_eq!(args.log_level(), LevelFilter::DEBUG);
}

#[test]
fn test_unknown_format_is_rejected() {
    assert!(Args::try_parse_from(["epc-sync", "--format", "pdf"]).is_err());
}
