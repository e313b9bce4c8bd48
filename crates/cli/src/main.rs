// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod app;
mod args;
mod config;

#[cfg(test)]
mod tests;

use args::Args;
use clap::Parser;
use color_eyre::Result;
use epc_sync::RunReport;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Exit status after an interrupt (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    // RUST_LOG, when set, refines the level chosen with -v/-q.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .init();

    // The run future owns the state lock; it is dropped, and the lock
    // released, as soon as the select completes.
    let result: Option<Result<RunReport>> = tokio::select! {
        result = app::run(&args) => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };

    match result {
        Some(Ok(_)) => Ok(()),
        Some(Err(err)) => {
            error!("{err:#}");
            std::process::exit(1);
        }
        None => {
            warn!("Interrupted, stored state left unchanged");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}
