//! Catalog loading.
//!
//! The catalog is a JSON file read fresh for every operation so edits
//! take effect without restarting anything. When the file is not at the
//! given path but exists one directory up, the copy one directory up is
//! used. That mirrors how the tool is deployed on endpoints, where the
//! binary often lives in a subfolder next to the shared catalog.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Catalog;

/// File name the catalog is looked up under by default.
pub const DEFAULT_CATALOG_FILE: &str = "catalog.json";

/// Load and parse the catalog at `path`, with the one-directory-up
/// fallback.
pub fn load(path: &Path) -> Result<Catalog> {
    let path = resolve_path(path);
    let text = fs::read_to_string(&path).map_err(|err| Error::Catalog {
        path: path.clone(),
        message: err.to_string(),
    })?;
    let catalog: Catalog = serde_json::from_str(&text)?;
    log::debug!(
        "loaded catalog from {} ({} packages)",
        path.display(),
        catalog.packages.len()
    );
    Ok(catalog)
}

/// Pick the actual file to read. The fallback is only taken when the
/// sibling copy exists; otherwise the original path is kept so error
/// messages name what the caller asked for.
fn resolve_path(path: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }
    if let Some(name) = path.file_name() {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let up = parent.join("..").join(name);
        if up.exists() {
            log::debug!("catalog not at {}, using {}", path.display(), up.display());
            return up;
        }
    }
    path.to_path_buf()
}
