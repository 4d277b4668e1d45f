//! Scratch directory for staged installers.
//!
//! Artifacts copied from a share or downloaded over HTTP are staged in a
//! fixed folder under the user's temp directory. The folder is created
//! lazily and deliberately never cleaned: MSI removal reuses the staged
//! installer from a previous install when the share is unreachable.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Folder name under the user temp directory.
pub const SCRATCH_DIR_NAME: &str = "rollout";

/// The staging area for resolved artifacts.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Scratch directory at the default location under the user temp dir.
    pub fn new() -> Self {
        Self {
            root: env::temp_dir().join(SCRATCH_DIR_NAME),
        }
    }

    /// Scratch directory at an explicit location.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Location of the scratch directory, which may not exist yet.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the directory if needed and return its path.
    pub fn ensure(&self) -> Result<&Path> {
        fs::create_dir_all(&self.root)?;
        Ok(&self.root)
    }

    /// Where an artifact for `package` is staged. The file keeps the
    /// extension of the source path and defaults to `.exe` when the
    /// source has none, so the dispatcher can classify it later.
    pub fn staged_path(&self, package: &str, source: &str) -> PathBuf {
        self.root
            .join(format!("{package}{}", extension_of(source)))
    }
}

impl Default for ScratchDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension of `source` including the dot, original case preserved.
/// Both slash styles count as separators so share-relative paths behave
/// the same on every host.
fn extension_of(source: &str) -> &str {
    let name_start = source.rfind(['/', '\\']).map(|idx| idx + 1).unwrap_or(0);
    match source[name_start..].rfind('.') {
        Some(dot) => &source[name_start + dot..],
        None => ".exe",
    }
}
