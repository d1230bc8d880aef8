//! Engine configuration
//!
//! One typed bootstrap struct loaded from TOML. Every field has a built-in
//! default, so an absent file means a stock grid against a local catalog.

use crate::breakpoints::{validate_table, Breakpoint, DEFAULT_BREAKPOINTS};
use pgrid_common::{Error, FilterCond, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Grid engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    /// Catalog service base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Post type the grid shows
    #[serde(default = "default_post_type")]
    pub post_type: String,

    /// Taxonomy the filter terms belong to
    #[serde(default = "default_taxonomy")]
    pub taxonomy: String,

    /// Condition combining active terms
    #[serde(default)]
    pub filter_cond: FilterCond,

    /// Breakpoint table, widest ranges first
    #[serde(default = "default_breakpoints")]
    pub breakpoints: Vec<Breakpoint>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:5780".to_string()
}

fn default_post_type() -> String {
    "post".to_string()
}

fn default_taxonomy() -> String {
    "category".to_string()
}

fn default_breakpoints() -> Vec<Breakpoint> {
    DEFAULT_BREAKPOINTS.to_vec()
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            post_type: default_post_type(),
            taxonomy: default_taxonomy(),
            filter_cond: FilterCond::default(),
            breakpoints: default_breakpoints(),
        }
    }
}

impl GridConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing file is not an error; defaults apply with a warning. A
    /// file that exists but fails to parse, or declares an unusable
    /// breakpoint table, is.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: GridConfig = toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        validate_table(&config.breakpoints)?;

        info!(path = %path.display(), "loaded grid configuration");
        Ok(config)
    }
}
