//! provkit is the engine behind the `rollout` CLI: it resolves installer
//! artifacts for catalog-described packages, detects what is already on
//! the machine, and drives installs, removals, and diagnostics through
//! the platform tools.
//!
//! The catalog is read fresh for every operation. Artifacts are found by
//! a fixed chain of sources (embedded resources, file-share roots, a
//! local path, HTTP download) and handed to a dispatcher that plans the
//! exact process invocation. Process execution sits behind the
//! [`dispatch::Launcher`] trait so everything above it can be tested
//! without touching the system.
//!
//! ```no_run
//! use provkit::Provisioner;
//!
//! let engine = Provisioner::new("catalog.json");
//! let report = engine.install("7-Zip");
//! println!("{}: {}", report.package, report.message);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod detect;
pub mod dispatch;
pub mod download;
pub mod embedded;
pub mod error;
pub mod locate;
pub mod scratch;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use types::{
    ArtifactOrigin, Catalog, OpReport, Outcome, PackageDescriptor, PackageStatus,
    ResolvedArtifact, ShareStatus,
};

use std::path::{Path, PathBuf};

use crate::detect::Detector;
use crate::dispatch::{Launcher, ProcessLauncher, ToolPrograms, Visibility, WaitMode};
use crate::embedded::EmbeddedStore;
use crate::locate::{Locator, LocatorConfig, ResolveContext};
use crate::scratch::ScratchDir;

/// Progress notifications during a bulk installation.
pub trait BulkProgress {
    /// Called before each package is attempted.
    fn package_started(&mut self, index: usize, total: usize, name: &str);
    /// Called after each package finishes, with its report.
    fn package_finished(&mut self, index: usize, total: usize, report: &OpReport);
}

/// Progress sink that ignores every notification.
pub struct NoProgress;

impl BulkProgress for NoProgress {
    fn package_started(&mut self, _index: usize, _total: usize, _name: &str) {}
    fn package_finished(&mut self, _index: usize, _total: usize, _report: &OpReport) {}
}

/// The provisioning engine.
///
/// One value of this type holds everything an operation needs: where the
/// catalog lives, the staging area, the resolution chain, the detector,
/// and the launcher that finally runs processes. Operations never panic
/// and never abort a batch; each returns an [`OpReport`] describing what
/// happened.
pub struct Provisioner {
    catalog_path: PathBuf,
    scratch: ScratchDir,
    locator: Locator,
    locator_config: LocatorConfig,
    embedded: EmbeddedStore,
    detector: Detector,
    launcher: Box<dyn Launcher>,
    programs: ToolPrograms,
}

impl Provisioner {
    /// Engine with default settings reading the catalog at `catalog_path`.
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            scratch: ScratchDir::new(),
            locator: Locator::new(),
            locator_config: LocatorConfig::default(),
            embedded: EmbeddedStore,
            detector: Detector::new(detect::DetectorConfig::default()),
            launcher: Box::new(ProcessLauncher),
            programs: ToolPrograms::default(),
        }
    }

    /// Replace the process launcher.
    #[must_use]
    pub fn with_launcher(mut self, launcher: Box<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Replace the scratch directory.
    #[must_use]
    pub fn with_scratch(mut self, scratch: ScratchDir) -> Self {
        self.scratch = scratch;
        self
    }

    /// Replace the locator configuration.
    #[must_use]
    pub fn with_locator_config(mut self, config: LocatorConfig) -> Self {
        self.locator_config = config;
        self
    }

    /// Replace the detector.
    #[must_use]
    pub fn with_detector(mut self, detector: Detector) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the host tool names used to build invocations.
    #[must_use]
    pub fn with_programs(mut self, programs: ToolPrograms) -> Self {
        self.programs = programs;
        self
    }

    /// Path the catalog is loaded from.
    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// The staging area in use.
    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Install one package.
    pub fn install(&self, name: &str) -> OpReport {
        OpReport::from_result(name, self.install_inner(name))
    }

    /// Install several packages in the given order. Every name yields a
    /// report and a failure never stops the rest of the batch.
    pub fn bulk_install(&self, names: &[String]) -> Vec<OpReport> {
        self.bulk_install_with_progress(names, &mut NoProgress)
    }

    /// [`Self::bulk_install`] with progress notifications.
    pub fn bulk_install_with_progress(
        &self,
        names: &[String],
        progress: &mut dyn BulkProgress,
    ) -> Vec<OpReport> {
        let total = names.len();
        let mut reports = Vec::with_capacity(total);
        for (index, name) in names.iter().enumerate() {
            progress.package_started(index, total, name);
            let report = self.install(name);
            progress.package_finished(index, total, &report);
            reports.push(report);
        }
        reports
    }

    /// Remove one package.
    pub fn uninstall(&self, name: &str) -> OpReport {
        OpReport::from_result(name, self.uninstall_inner(name))
    }

    /// Launch the diagnostic console for one package.
    pub fn test(&self, name: &str) -> OpReport {
        OpReport::from_result(name, self.test_inner(name))
    }

    /// Whether `name` appears to be installed on this machine.
    pub fn is_installed(&self, name: &str) -> bool {
        self.detector.is_installed(name)
    }

    /// Every catalog entry with its installed state, freshly recomputed.
    pub fn survey(&self) -> Result<Vec<PackageStatus>> {
        let catalog = catalog::load(&self.catalog_path)?;
        Ok(catalog
            .packages
            .iter()
            .map(|pkg| PackageStatus {
                installed: self.detector.is_installed(&pkg.name),
                package: pkg.clone(),
            })
            .collect())
    }

    /// Reachability of the catalog's share base.
    pub fn share_status(&self) -> Result<ShareStatus> {
        let catalog = catalog::load(&self.catalog_path)?;
        let base = catalog.share_base;
        if !base.is_empty() && Path::new(&base).exists() {
            Ok(ShareStatus::Reachable(base))
        } else {
            Ok(ShareStatus::Offline(base))
        }
    }

    // ========================================================================
    // Inner operation bodies
    // ========================================================================

    fn install_inner(&self, name: &str) -> Result<String> {
        let catalog = catalog::load(&self.catalog_path)?;
        let pkg = catalog.find(name).ok_or_else(|| Error::PackageNotFound {
            name: name.to_string(),
        })?;
        let ctx = ResolveContext {
            share_base: &catalog.share_base,
            scratch: &self.scratch,
            config: &self.locator_config,
            embedded: &self.embedded,
        };
        let artifact = self.locator.resolve(pkg, &ctx)?;
        let invocation = dispatch::install_invocation(
            &artifact.path,
            &pkg.install_args,
            Visibility::from_flag(pkg.interactive),
            &self.programs,
        );
        self.launcher.launch(&invocation)?;
        Ok(format!("{} installed", pkg.name))
    }

    fn uninstall_inner(&self, name: &str) -> Result<String> {
        let catalog = catalog::load(&self.catalog_path)?;
        let pkg = catalog.find(name).ok_or_else(|| Error::PackageNotFound {
            name: name.to_string(),
        })?;
        if pkg.uninstall_args.is_empty() {
            return Err(Error::NotConfigured {
                name: pkg.name.clone(),
                what: "uninstall arguments",
            });
        }
        let visibility = Visibility::from_flag(pkg.interactive);

        if pkg.share_path.to_lowercase().ends_with(".msi") {
            let installer = self.find_msi_installer(&catalog, pkg)?;
            let invocation = dispatch::msi_uninstall_invocation(
                &installer,
                &pkg.uninstall_args,
                visibility,
                &self.programs,
            );
            self.launcher.launch(&invocation)?;
            return Ok(format!("{} removed", pkg.name));
        }

        if pkg.embedded {
            let script = self
                .embedded
                .extract(&pkg.share_path, &self.scratch)
                .ok_or_else(|| Error::EmbeddedMissing {
                    name: pkg.name.clone(),
                    resource: pkg.share_path.clone(),
                })?;
            let invocation = dispatch::embedded_script_invocation(
                &script,
                &pkg.uninstall_args,
                WaitMode::Wait,
                &self.programs,
            );
            self.launcher.launch(&invocation)?;
            return Ok(format!("{} removed", pkg.name));
        }

        let raw = pkg.uninstall_args.join(" ");
        let invocation = dispatch::command_line_invocation(&raw, visibility, &self.programs)?;
        self.launcher.launch(&invocation)?;
        Ok(format!("{} removed", pkg.name))
    }

    /// MSI removal needs the original installer. The share base is
    /// preferred; the staged copy from a previous install is the backup.
    fn find_msi_installer(&self, catalog: &Catalog, pkg: &PackageDescriptor) -> Result<PathBuf> {
        if !catalog.share_base.is_empty() {
            let root = Path::new(&catalog.share_base);
            if root.exists() {
                let candidate = root.join(&pkg.share_path);
                if candidate.exists() {
                    return Ok(candidate);
                }
            }
        }
        let staged = self.scratch.staged_path(&pkg.name, &pkg.share_path);
        if staged.exists() {
            log::debug!("using staged installer {}", staged.display());
            return Ok(staged);
        }
        Err(Error::InstallerUnavailable {
            name: pkg.name.clone(),
        })
    }

    fn test_inner(&self, name: &str) -> Result<String> {
        let catalog = catalog::load(&self.catalog_path)?;
        let pkg = catalog.find(name).ok_or_else(|| Error::PackageNotFound {
            name: name.to_string(),
        })?;
        if pkg.test_args.is_empty() {
            return Err(Error::NotConfigured {
                name: pkg.name.clone(),
                what: "test diagnostics",
            });
        }
        let invocation = if pkg.embedded {
            let script = self
                .embedded
                .extract(&pkg.share_path, &self.scratch)
                .ok_or_else(|| Error::EmbeddedMissing {
                    name: pkg.name.clone(),
                    resource: pkg.share_path.clone(),
                })?;
            dispatch::embedded_script_invocation(
                &script,
                &pkg.test_args,
                WaitMode::Spawn,
                &self.programs,
            )
        } else {
            dispatch::diagnostic_invocation(&pkg.test_args.join(" "), &self.programs)
        };
        self.launcher.launch(&invocation)?;
        Ok(format!("diagnostics launched for {}", pkg.name))
    }
}
