//! CLI argument definitions using clap
//!
//! Commands:
//! - crudstore init --config <path>
//! - crudstore start --config <path> [--port <port>]
//! - crudstore list --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// crudstore - a file-backed person record service
#[derive(Parser, Debug)]
#[command(name = "crudstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config (if absent) and an empty data file (if absent)
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./crudstore.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./crudstore.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print every record as JSON and exit
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./crudstore.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
