//! Path resolution for the config file and data directory.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, xdg_data_dir, ComptesConfig};
use crate::errors::CliError;

/// Resolve the config file path: `--config` (or `COMPTES_CONFIG`), else
/// the XDG default.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    match &cli.config {
        Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
        _ => default_config_path(),
    }
}

/// Resolve the data directory: `--data-dir` (or `COMPTES_DATA_DIR`), then
/// the config's `[storage] data_dir`, then the XDG default.
pub fn resolve_data_dir(cli: &Cli, config: &ComptesConfig) -> anyhow::Result<PathBuf> {
    if let Some(dir) = cli.data_dir.as_ref().filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir.clone());
    }
    if let Some(dir) = config
        .storage
        .data_dir
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        return Ok(PathBuf::from(dir));
    }
    xdg_data_dir()
}

/// Error returned when a command needs a config that does not exist yet.
pub fn missing_config(config_path: &Path) -> CliError {
    CliError::not_found(
        format!("No config found at {}", config_path.display()),
        "Run `comptes init` to create one, or pass --config.",
    )
}
