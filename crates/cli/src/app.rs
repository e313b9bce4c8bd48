// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::args::Args;
use crate::config::{AppConfig, load_listings};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use epc_sync::{OutputFormat, RunOutcome, RunReport, StateStore, SyncConfig, Synchronizer};
use epc_sync_export::FileSink;
use epc_sync_persistence::open_state_store;
use epc_sync_source::{EpcFieldExtractor, HttpPageFetcher};
use time::OffsetDateTime;
use tracing::info;

/// Loads the settings named on the command line and performs one run.
///
/// # Errors
///
/// Returns an error if the settings cannot be loaded or the run fails.
pub async fn run(args: &Args) -> Result<RunReport> {
    let mut config: AppConfig = AppConfig::load(&args.config)?;
    config.apply_args(args);
    run_with(&config).await
}

/// Performs one run with `config`.
///
/// Everything that can be checked without the network is checked before
/// the state store is locked.
///
/// # Errors
///
/// Returns an error if:
/// - The listing input or a setting is invalid
/// - The state store is locked by another run or cannot be opened
/// - The run itself fails
pub async fn run_with(config: &AppConfig) -> Result<RunReport> {
    let sync_config: SyncConfig = config.sync_config(load_listings(&config.input_file)?)?;
    let formats: Vec<OutputFormat> = config.output_formats();
    let fetcher: HttpPageFetcher = HttpPageFetcher::from_settings(config.http_settings()?)?;
    let run_at: OffsetDateTime = OffsetDateTime::now_utc();
    let mut sink: FileSink =
        FileSink::new(&config.output_dir, &config.base_name)?.with_generated_at(run_at);

    let mut store: Box<dyn StateStore> = open_state_store(&config.state_file)
        .wrap_err_with(|| format!("failed to open state {}", config.state_file.display()))?;

    info!(
        mode = %sync_config.mode,
        listings = sync_config.source_listings.len(),
        state = %config.state_file.display(),
        output = %config.output_dir.display(),
        "Starting run"
    );

    let synchronizer: Synchronizer<'_> =
        Synchronizer::new(&sync_config, &fetcher, &EpcFieldExtractor);
    let outcome: RunOutcome = synchronizer
        .run(store.as_mut(), &mut sink, &formats, run_at)
        .await?;

    info!("{}", outcome.report);
    Ok(outcome.report)
}
