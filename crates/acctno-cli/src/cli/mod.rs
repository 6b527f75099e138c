//! Argument parsing, logging setup, and the subcommands of the `acctno`
//! binary.
//!
//! ## Structure
//!
//! - [`config`] - `CliArgs` (clap + environment) and the validated `AppConfig`.
//! - [`telemetry`] - `tracing` subscriber writing to stderr.
//! - [`commands`] - one function per subcommand.

pub mod commands;
pub mod config;
pub mod telemetry;
