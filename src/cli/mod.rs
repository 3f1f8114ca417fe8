//! CLI module
//!
//! Provides command-line interface for:
//! - init: write default config and an empty data file
//! - start: serve the HTTP API and form pages
//! - list: print the collection as JSON

mod args;
mod commands;
mod config;
mod errors;
mod logging;

pub use args::{Cli, Command};
pub use commands::{init, list, run, run_command, start};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use logging::init_logging;
