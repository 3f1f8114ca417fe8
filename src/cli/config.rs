//! Service configuration file
//!
//! A flat JSON object; every field is optional:
//!
//! ```json
//! {
//!     "data_file": "data.json",
//!     "log_filter": "info",
//!     "host": "127.0.0.1",
//!     "port": 5020,
//!     "cors_origins": []
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Collection document path (default "data.json")
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// tracing filter directive, overridden by RUST_LOG (default "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(flatten)]
    pub http: HttpServerConfig,
}

fn default_data_file() -> String {
    "data.json".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_filter: default_log_filter(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Writes the default configuration unless a file already exists.
    ///
    /// Returns `true` if a file was written.
    pub fn write_default(path: &Path) -> CliResult<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&Config::default())?;
        fs::write(path, content)?;
        Ok(true)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.trim().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        EnvFilter::try_new(&self.log_filter).map_err(|e| {
            CliError::config_error(format!("Invalid log_filter '{}': {}", self.log_filter, e))
        })?;

        Ok(())
    }

    /// Data file path, relative paths resolved against `base`
    /// (normally the config file's directory)
    pub fn data_path(&self, base: &Path) -> std::path::PathBuf {
        let path = Path::new(&self.data_file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flat_file_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("crudstore.json");
        fs::write(&path, r#"{"data_file": "people.json", "port": 8000}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_file, "people.json");
        assert_eq!(config.http.port, 8000);
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_rejects_zero_port_and_empty_data_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("crudstore.json");

        fs::write(&path, r#"{"port": 0}"#).unwrap();
        assert!(Config::load(&path).is_err());

        fs::write(&path, r#"{"data_file": "  "}"#).unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_write_default_round_trips_and_keeps_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("conf/crudstore.json");

        assert!(Config::write_default(&path).unwrap());
        assert_eq!(Config::load(&path).unwrap(), Config::default());

        fs::write(&path, r#"{"port": 9999}"#).unwrap();
        assert!(!Config::write_default(&path).unwrap());
        assert_eq!(Config::load(&path).unwrap().http.port, 9999);
    }

    #[test]
    fn test_data_path_resolution() {
        let config = Config::default();
        assert_eq!(config.data_path(Path::new("/srv")), Path::new("/srv/data.json"));

        let absolute = Config {
            data_file: "/var/lib/crud/data.json".to_string(),
            ..Config::default()
        };
        assert_eq!(absolute.data_path(Path::new("/srv")), Path::new("/var/lib/crud/data.json"));
    }
}
