//! Artifact resolution.
//!
//! Finding an installer walks a fixed chain of sources: embedded
//! resources, share roots in priority order, a plain local file, and
//! finally an HTTP download. The first source that produces a file wins
//! and later sources are never consulted. A source that has nothing to
//! offer steps aside silently; only a source that claims the package and
//! then fails stops the chain.

use std::fs;
use std::path::PathBuf;

use crate::download;
use crate::embedded::EmbeddedStore;
use crate::error::{Error, Result};
use crate::scratch::ScratchDir;
use crate::types::{ArtifactOrigin, PackageDescriptor, ResolvedArtifact};

/// Locations the chain searches besides the catalog share base.
#[derive(Debug, Clone, Default)]
pub struct LocatorConfig {
    /// Extra share roots probed after the catalog base, in order.
    pub alternate_roots: Vec<PathBuf>,
    /// Base directory for descriptor paths tried as plain local files.
    /// Empty means relative to the working directory.
    pub local_base: PathBuf,
}

/// Everything a source needs to produce an artifact.
pub struct ResolveContext<'a> {
    /// Share base from the catalog, possibly empty.
    pub share_base: &'a str,
    /// Staging area for copies and downloads.
    pub scratch: &'a ScratchDir,
    /// Locator tunables.
    pub config: &'a LocatorConfig,
    /// Compiled-in resources.
    pub embedded: &'a EmbeddedStore,
}

/// One step of the resolution chain.
pub trait Source: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to produce the artifact. `None` means this source has nothing
    /// for the package and the chain moves on. `Some(Err)` stops the
    /// chain immediately.
    fn attempt(
        &self,
        pkg: &PackageDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Option<Result<ResolvedArtifact>>;
}

// ============================================================================
// Chain steps
// ============================================================================

/// Resolves packages marked as embedded. Owns those packages entirely:
/// when extraction fails the chain stops rather than hunting for a
/// same-named file elsewhere.
pub struct EmbeddedSource;

impl Source for EmbeddedSource {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn attempt(
        &self,
        pkg: &PackageDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Option<Result<ResolvedArtifact>> {
        if !pkg.embedded {
            return None;
        }
        let result = ctx
            .embedded
            .extract(&pkg.share_path, ctx.scratch)
            .map(|path| ResolvedArtifact {
                path,
                origin: ArtifactOrigin::Embedded,
            })
            .ok_or_else(|| Error::EmbeddedMissing {
                name: pkg.name.clone(),
                resource: pkg.share_path.clone(),
            });
        Some(result)
    }
}

/// Copies the artifact from the first share root that has it. Roots that
/// are unreachable, lack the file, or fail mid-copy are skipped.
pub struct ShareSource;

impl Source for ShareSource {
    fn name(&self) -> &'static str {
        "share"
    }

    fn attempt(
        &self,
        pkg: &PackageDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Option<Result<ResolvedArtifact>> {
        if pkg.share_path.is_empty() {
            return None;
        }
        let mut roots = Vec::new();
        if !ctx.share_base.is_empty() {
            roots.push(PathBuf::from(ctx.share_base));
        }
        roots.extend(ctx.config.alternate_roots.iter().cloned());

        for root in roots {
            if !root.exists() {
                log::debug!("share root {} is unreachable", root.display());
                continue;
            }
            let candidate = root.join(&pkg.share_path);
            if !candidate.exists() {
                continue;
            }
            if let Err(err) = ctx.scratch.ensure() {
                log::warn!("cannot prepare scratch directory: {err}");
                continue;
            }
            let dest = ctx.scratch.staged_path(&pkg.name, &pkg.share_path);
            match fs::copy(&candidate, &dest) {
                Ok(_) => {
                    return Some(Ok(ResolvedArtifact {
                        path: dest,
                        origin: ArtifactOrigin::Share(root),
                    }));
                }
                Err(err) => {
                    log::warn!("copy from {} failed: {err}", candidate.display());
                    continue;
                }
            }
        }
        None
    }
}

/// Uses the descriptor path directly as a local file, no staging.
pub struct LocalSource;

impl Source for LocalSource {
    fn name(&self) -> &'static str {
        "local"
    }

    fn attempt(
        &self,
        pkg: &PackageDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Option<Result<ResolvedArtifact>> {
        if pkg.share_path.is_empty() {
            return None;
        }
        let candidate = ctx.config.local_base.join(&pkg.share_path);
        candidate.exists().then(|| {
            Ok(ResolvedArtifact {
                path: candidate,
                origin: ArtifactOrigin::Local,
            })
        })
    }
}

/// Fetches the artifact over HTTP into the scratch directory.
pub struct DownloadSource;

impl Source for DownloadSource {
    fn name(&self) -> &'static str {
        "download"
    }

    fn attempt(
        &self,
        pkg: &PackageDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Option<Result<ResolvedArtifact>> {
        if pkg.download_url.is_empty() {
            return None;
        }
        if let Err(err) = ctx.scratch.ensure() {
            return Some(Err(err));
        }
        let dest = ctx.scratch.staged_path(&pkg.name, &pkg.share_path);
        let result = download::fetch(&pkg.download_url, &dest).map(|_| ResolvedArtifact {
            path: dest,
            origin: ArtifactOrigin::Downloaded,
        });
        Some(result)
    }
}

// ============================================================================
// The chain itself
// ============================================================================

/// Runs the resolution chain over its sources in order.
pub struct Locator {
    sources: Vec<Box<dyn Source>>,
}

impl Locator {
    /// Locator with the standard chain: embedded, share, local, download.
    pub fn new() -> Self {
        Self {
            sources: vec![
                Box::new(EmbeddedSource),
                Box::new(ShareSource),
                Box::new(LocalSource),
                Box::new(DownloadSource),
            ],
        }
    }

    /// Locator with a custom chain.
    pub fn with_sources(sources: Vec<Box<dyn Source>>) -> Self {
        Self { sources }
    }

    /// Resolve `pkg` to a runnable file, or fail once the whole chain is
    /// exhausted.
    pub fn resolve(
        &self,
        pkg: &PackageDescriptor,
        ctx: &ResolveContext<'_>,
    ) -> Result<ResolvedArtifact> {
        for source in &self.sources {
            match source.attempt(pkg, ctx) {
                Some(Ok(artifact)) => {
                    log::info!(
                        "resolved {} via {} source: {}",
                        pkg.name,
                        source.name(),
                        artifact.path.display()
                    );
                    return Ok(artifact);
                }
                Some(Err(err)) => return Err(err),
                None => {
                    log::debug!("{} source has nothing for {}", source.name(), pkg.name);
                }
            }
        }
        Err(Error::ArtifactNotFound {
            name: pkg.name.clone(),
            share_path: pkg.share_path.clone(),
        })
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}
