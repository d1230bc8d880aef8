//! Configuration for pgrid-server
//!
//! Bootstrap settings only: where the catalog lives and which port to
//! listen on. Settings priority: command-line arguments, then the TOML
//! file, then built-in defaults.

use pgrid_common::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite catalog file (created on first run)
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_port() -> u16 {
    5780
}

fn default_database_path() -> PathBuf {
    PathBuf::from("pgrid.db")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_path: default_database_path(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file, then apply overrides
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(path: &Path, overrides: ConfigOverrides) -> Result<Self> {
        let config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            let config: ServerConfig = toml::from_str(&raw)
                .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
            info!("Loaded configuration from {}", path.display());
            config
        } else {
            warn!("Config file {} not found, using defaults", path.display());
            ServerConfig::default()
        };

        Ok(config.with_overrides(overrides))
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(database_path) = overrides.database_path {
            self.database_path = database_path;
        }
        self
    }
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
}
