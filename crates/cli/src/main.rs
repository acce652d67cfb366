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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod scenario;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use paylog::EngineConfig;
use paylog_domain::EmployeeId;
use scenario::{LeaveReport, RecalculationReport, Scenario, leave_report, load_config, load_json};
use serde::Serialize;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    // RUST_LOG wins over the verbosity flag when set.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Paylog - prices a day's work log from a JSON scenario
#[derive(Debug, Parser)]
#[command(name = "paylog", author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Replay a scenario's commands and recalculate every entry
    #[command(visible_alias = "r")]
    Recalculate {
        /// Scenario document
        #[arg(short, long)]
        input: PathBuf,

        /// Engine configuration. Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Take the day type from the scenario's holiday calendar
        #[arg(long)]
        derive_day_type: bool,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Show which leave category an employee would take on the log date
    #[command(visible_alias = "l")]
    Leave {
        /// Scenario document
        #[arg(short, long)]
        input: PathBuf,

        /// The employee going on leave
        #[arg(short, long)]
        employee: String,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::Recalculate {
                input,
                config,
                derive_day_type,
                pretty,
            } => {
                let scenario: Scenario = load_json(&input)?;
                let config: EngineConfig = load_config(config.as_deref())?;
                let report: RecalculationReport =
                    scenario::run_recalculation(scenario, &config, derive_day_type)
                        .wrap_err_with(|| format!("failed to run {}", input.display()))?;
                for failure in &report.failures {
                    tracing::warn!(
                        entry = %failure.key,
                        error = %failure.error,
                        "Entry not priced"
                    );
                }
                print_json(&report, pretty)
            }
            Self::Leave {
                input,
                employee,
                pretty,
            } => {
                let scenario: Scenario = load_json(&input)?;
                let report: LeaveReport = leave_report(&scenario, &EmployeeId::new(&employee))?;
                print_json(&report, pretty)
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered: String = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .wrap_err("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
