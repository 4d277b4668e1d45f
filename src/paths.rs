//! Centralized path resolution for rollout
//!
//! This module provides path resolution with environment variable
//! support, so fleet automation can point the tool at a different
//! catalog, staging area, or settings directory per machine.
//!
//! # Environment Variables
//!
//! - `ROLLOUT_CATALOG` - Override the catalog file location
//! - `ROLLOUT_SCRATCH_DIR` - Override the staging directory
//! - `ROLLOUT_CONFIG_DIR` - Override the settings directory

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for catalog file override
pub const ENV_CATALOG: &str = "ROLLOUT_CATALOG";

/// Environment variable for scratch directory override
pub const ENV_SCRATCH_DIR: &str = "ROLLOUT_SCRATCH_DIR";

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "ROLLOUT_CONFIG_DIR";

/// Get the catalog file path
///
/// Priority:
/// 1. `ROLLOUT_CATALOG` env var
/// 2. `catalog.json` in the working directory (with the loader's
///    one-directory-up fallback)
pub fn catalog_path() -> PathBuf {
    if let Ok(path) = std::env::var(ENV_CATALOG) {
        let path = expand(&path);
        log::debug!("Using catalog from {}: {}", ENV_CATALOG, path.display());
        return path;
    }
    PathBuf::from(provkit::catalog::DEFAULT_CATALOG_FILE)
}

/// Get the scratch directory override from the environment, if any
pub fn scratch_override() -> Option<PathBuf> {
    match std::env::var(ENV_SCRATCH_DIR) {
        Ok(dir) => {
            let path = expand(&dir);
            log::debug!("Using scratch dir from {}: {}", ENV_SCRATCH_DIR, path.display());
            Some(path)
        }
        Err(_) => None,
    }
}

/// Get the rollout config directory path
///
/// Priority:
/// 1. `ROLLOUT_CONFIG_DIR` env var
/// 2. Platform config dir (`%APPDATA%\rollout` on Windows)
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!("Using config dir from {}: {}", ENV_CONFIG_DIR, path.display());
        return Ok(path);
    }
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join("rollout"))
}

/// Get the settings file path inside the config directory
pub fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("rollout.toml"))
}

/// Expand ~ and environment variables in a path string.
///
/// This is the canonical path expansion function for rollout. All modules
/// should use this instead of calling shellexpand directly.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
