//! Resources compiled into the binary.
//!
//! A handful of maintenance scripts ship inside the executable so they
//! work on endpoints with no share and no internet. Extraction failures
//! are reported as `None` rather than an error; the caller decides what
//! a missing resource means for its operation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::scratch::ScratchDir;

/// Scripts bundled at compile time, keyed by resource name.
const RESOURCES: &[(&str, &str)] = &[
    (
        "service-report.ps1",
        include_str!("../assets/scripts/service-report.ps1"),
    ),
    (
        "stack-bootstrap.ps1",
        include_str!("../assets/scripts/stack-bootstrap.ps1"),
    ),
];

/// Access to the compiled-in resource set.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedStore;

impl EmbeddedStore {
    /// Whether `name` is a bundled resource.
    pub fn contains(&self, name: &str) -> bool {
        RESOURCES.iter().any(|(key, _)| *key == name)
    }

    /// Write the resource named `name` into the scratch directory and
    /// return its path, or `None` if the resource is unknown or cannot
    /// be written.
    pub fn extract(&self, name: &str, scratch: &ScratchDir) -> Option<PathBuf> {
        let Some((_, body)) = RESOURCES.iter().find(|(key, _)| *key == name) else {
            log::warn!("no embedded resource named {name:?}");
            return None;
        };
        let dir = match scratch.ensure() {
            Ok(dir) => dir,
            Err(err) => {
                log::warn!("cannot prepare scratch directory for {name}: {err}");
                return None;
            }
        };
        let file_name = Path::new(name).file_name().unwrap_or_default();
        let dest = dir.join(file_name);
        if let Err(err) = fs::write(&dest, body) {
            log::warn!("cannot extract {name} to {}: {err}", dest.display());
            return None;
        }
        log::debug!("extracted embedded resource {name} to {}", dest.display());
        Some(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_known_resources() {
        let store = EmbeddedStore;
        assert!(store.contains("service-report.ps1"));
        assert!(store.contains("stack-bootstrap.ps1"));
        assert!(!store.contains("missing.ps1"));
    }

    #[test]
    fn test_extract_writes_script_body() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::at(dir.path().join("stage"));

        let path = EmbeddedStore.extract("service-report.ps1", &scratch).unwrap();
        assert_eq!(path, scratch.path().join("service-report.ps1"));
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("Get-Service"));
    }

    #[test]
    fn test_extract_unknown_resource_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::at(dir.path());
        assert!(EmbeddedStore.extract("missing.ps1", &scratch).is_none());
    }

    #[test]
    fn test_extract_overwrites_previous_copy() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::at(dir.path().join("stage"));
        scratch.ensure().unwrap();
        fs::write(scratch.path().join("stack-bootstrap.ps1"), "stale").unwrap();

        let path = EmbeddedStore.extract("stack-bootstrap.ps1", &scratch).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert_ne!(body, "stale");
    }
}
