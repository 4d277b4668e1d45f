//! HTTP download fallback.
//!
//! Last resort of the resolution chain: a plain GET streamed to the
//! scratch directory. No retries and no resume; a fresh copy is fetched
//! every time so endpoints never run a stale installer.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Upper bound on a downloaded installer body.
const MAX_BODY_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// Fetch `url` into `dest`, returning the number of bytes written.
pub fn fetch(url: &str, dest: &Path) -> Result<u64> {
    log::info!("downloading {url} to {}", dest.display());
    let agent = ureq::Agent::new_with_defaults();
    let mut response = agent.get(url).header("User-Agent", "rollout").call()?;
    let mut body = response
        .body_mut()
        .with_config()
        .limit(MAX_BODY_SIZE)
        .reader();
    let mut file = File::create(dest)?;
    let written = io::copy(&mut body, &mut file).map_err(|err| Error::Download {
        url: url.to_string(),
        message: err.to_string(),
    })?;
    log::debug!("downloaded {written} bytes from {url}");
    Ok(written)
}
