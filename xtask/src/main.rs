// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workspace automation for epc-sync.
//!
//! `cargo xtask ci` is what the pipeline runs. `cargo xtask test-live` talks
//! to the public certificate register and is never part of `ci`.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use duct::cmd;
use tracing::{error, info};
use tracing_log::AsTrace;

/// Package holding the ignored tests that hit the live register.
const LIVE_TEST_PACKAGE: &str = "epc-sync-source";

/// Cargo invocations behind `lint`.
const LINT_STEPS: &[&[&str]] = &[
    &["fmt", "--all", "--check"],
    &[
        "clippy",
        "--workspace",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ],
];

/// Cargo invocations behind `test`.
const TEST_STEPS: &[&[&str]] = &[
    &["test", "--workspace", "--all-targets"],
    &["test", "--workspace", "--doc"],
];

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", about = "Build automation for epc-sync")]
struct Args {
    #[command(subcommand)]
    task: Task,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Task {
    /// Lint, build and run the offline test suite
    Ci,
    /// Check formatting and run clippy with warnings denied
    Lint,
    /// Run the offline test suite
    Test,
    /// Run the ignored tests against the live certificate register
    TestLive,
}

impl Task {
    fn steps(self) -> Vec<&'static [&'static str]> {
        match self {
            Self::Ci => {
                let mut steps: Vec<&[&str]> = LINT_STEPS.to_vec();
                steps.push(&["build", "--workspace", "--all-targets"]);
                steps.extend_from_slice(TEST_STEPS);
                steps
            }
            Self::Lint => LINT_STEPS.to_vec(),
            Self::Test => TEST_STEPS.to_vec(),
            Self::TestLive => vec![&[
                "test",
                "--package",
                LIVE_TEST_PACKAGE,
                "--",
                "--ignored",
                "--test-threads=1",
            ]],
        }
    }
}

fn cargo(args: &[&str]) -> Result<()> {
    info!("cargo {}", args.join(" "));
    cmd("cargo", args)
        .run()
        .with_context(|| format!("cargo {} failed", args.join(" ")))?;
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbosity.log_level_filter().as_trace())
        .without_time()
        .init();

    for step in args.task.steps() {
        if let Err(err) = cargo(step) {
            error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}
