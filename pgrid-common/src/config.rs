//! Configuration file path resolution

use std::path::PathBuf;

/// Returns the platform config path for a PGRID file
/// (`<config_dir>/pgrid/<file_name>`), when the platform config directory
/// is known.
pub fn default_config_path(file_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pgrid").join(file_name))
}
