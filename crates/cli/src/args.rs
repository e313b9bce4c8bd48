// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use epc_sync::{OutputFormat, SyncMode};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

/// EPC Sync - scrape and monitor energy performance certificate listings
#[derive(Parser, Debug)]
#[command(name = "epc-sync", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON settings file
    #[arg(short, long, default_value = "config/settings.json")]
    pub config: PathBuf,

    /// Force a full scrape, whatever the settings say
    #[arg(long, conflicts_with = "monitor")]
    pub full: bool,

    /// Force monitoring mode, whatever the settings say
    #[arg(long)]
    pub monitor: bool,

    /// Output format (json, csv, excel, xml, rss, html). Repeat for more
    /// than one; replaces the configured formats
    #[arg(long = "format", value_name = "FORMAT")]
    pub formats: Vec<OutputFormat>,

    /// Directory output files are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Path of the state file kept between runs
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Maximum number of pages fetched per listing
    #[arg(long)]
    pub max_pages: Option<u32>,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    /// The mode forced on the command line, if any.
    pub const fn mode_override(&self) -> Option<SyncMode> {
        if self.full {
            Some(SyncMode::FullScrape)
        } else if self.monitor {
            Some(SyncMode::Monitoring)
        } else {
            None
        }
    }
}
