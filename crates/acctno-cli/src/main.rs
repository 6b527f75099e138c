#![doc = include_str!("../README.md")]

mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::config::{AppConfig, CliArgs};
use cli::telemetry::init_telemetry;

fn main() -> anyhow::Result<ExitCode> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_telemetry()?;

    if cfg!(debug_assertions) {
        tracing::debug!("Running with full config: {:#?}", config);
    }

    cli::commands::run(config, &mut std::io::stdout().lock())
}
