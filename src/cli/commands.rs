//! CLI command implementations

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::logging::init_logging;
use crate::http_server::{AppState, HttpServer};
use crate::storage::{JsonFileStorage, Storage};
use crate::store::RecordStore;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Start { config, port } => start(&config, port),
        Command::List { config } => list(&config, &mut io::stdout()),
    }
}

fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn load(config_path: &Path) -> CliResult<(Config, JsonFileStorage)> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_filter);
    let storage = JsonFileStorage::new(config.data_path(&config_dir(config_path)));
    Ok((config, storage))
}

/// Writes a default config and an empty collection, keeping whatever
/// already exists.
pub fn init(config_path: &Path) -> CliResult<()> {
    let wrote_config = Config::write_default(config_path)?;
    let (_config, storage) = load(config_path)?;

    if wrote_config {
        info!(path = %config_path.display(), "wrote default config");
    }

    let created = storage
        .ensure_exists()
        .map_err(|e| CliError::boot_failed(format!("Failed to create data file: {}", e)))?;
    if created {
        info!(path = %storage.path().display(), "created empty collection");
    } else {
        // Surfaces a malformed existing document at init time.
        let records = storage
            .load()
            .map_err(|e| CliError::boot_failed(format!("Existing data file unusable: {}", e)))?;
        info!(path = %storage.path().display(), records = records.len(), "data file already present");
    }

    Ok(())
}

/// Serves HTTP until the process is stopped
pub fn start(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let (mut config, storage) = load(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    info!(medium = %storage.describe(), "opening record store");
    let store = Arc::new(RecordStore::new(Box::new(storage) as Box<dyn Storage>));
    let server = HttpServer::new(config.http.clone(), AppState::from_store(store));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Writes the whole collection as pretty JSON to `out`
pub fn list<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    let (_config, storage) = load(config_path)?;
    let records = RecordStore::new(storage).list_all()?;

    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}
