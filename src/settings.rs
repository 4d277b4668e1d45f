//! Operator settings for rollout
//!
//! Settings live in `rollout.toml` under the config directory and cover
//! the knobs that vary between sites: extra share roots, a staging
//! directory override, and additions to the detector's known-file table.
//! A missing file just means defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::paths;

/// Site-specific settings loaded from `rollout.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Share roots probed after the catalog's base, in order.
    pub alternate_share_roots: Vec<String>,

    /// Staging directory override.
    pub scratch_dir: Option<String>,

    /// Extra known install locations, merged into the built-in detector
    /// table. Keys are package names, values are root-relative paths.
    pub known_files: BTreeMap<String, Vec<String>>,
}

impl Settings {
    /// Load settings from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::settings_path()?)
    }

    /// Load settings from an explicit path. A missing file yields
    /// defaults; an unreadable or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("rollout.toml")).unwrap();
        assert!(settings.alternate_share_roots.is_empty());
        assert!(settings.scratch_dir.is_none());
        assert!(settings.known_files.is_empty());
    }

    #[test]
    fn test_parses_full_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollout.toml");
        fs::write(
            &path,
            r#"
alternate_share_roots = ["\\\\backup01\\deploy", "\\\\backup02\\deploy"]
scratch_dir = "D:\\stage"

[known_files]
"Custom Agent" = ["CustomCorp\\Agent\\agent.exe"]
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(
            settings.alternate_share_roots,
            ["\\\\backup01\\deploy", "\\\\backup02\\deploy"]
        );
        assert_eq!(settings.scratch_dir.as_deref(), Some("D:\\stage"));
        assert_eq!(
            settings.known_files["Custom Agent"],
            ["CustomCorp\\Agent\\agent.exe"]
        );
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollout.toml");
        fs::write(&path, "scratch_dir = \"/tmp/stage\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.scratch_dir.as_deref(), Some("/tmp/stage"));
        assert!(settings.alternate_share_roots.is_empty());
    }

    #[test]
    fn test_malformed_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollout.toml");
        fs::write(&path, "alternate_share_roots = 5\n").unwrap();

        assert!(Settings::load_from(&path).is_err());
    }
}
