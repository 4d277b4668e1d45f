//! Core types shared across the provisioning engine.
//!
//! The catalog model mirrors the JSON the fleet is managed with: a share
//! base plus a flat list of package descriptors. Operation results are
//! reported as [`OpReport`] values so callers can render them however
//! they like.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// Catalog model
// ============================================================================

/// A single installable package as described by the catalog.
///
/// Only `name` is mandatory. Everything else defaults to empty so the
/// catalog can describe anything from a bare MSI to an embedded
/// maintenance script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Display name, also the catalog lookup key.
    pub name: String,
    /// Path of the installer relative to a share root.
    #[serde(default)]
    pub share_path: String,
    /// HTTP fallback URL used when no share root has the artifact.
    #[serde(default)]
    pub download_url: String,
    /// Arguments appended to the install invocation.
    #[serde(default)]
    pub install_args: Vec<String>,
    /// Raw command line (or script arguments) used for removal.
    #[serde(default)]
    pub uninstall_args: Vec<String>,
    /// Arguments for the diagnostic console.
    #[serde(default)]
    pub test_args: Vec<String>,
    /// Run installers visibly instead of silently.
    #[serde(default)]
    pub interactive: bool,
    /// Resolve the artifact from resources compiled into the binary.
    #[serde(default)]
    pub embedded: bool,
    /// Free-form grouping label.
    #[serde(default)]
    pub category: String,
    /// Secondary grouping label.
    #[serde(default)]
    pub sub_category: String,
    /// Human-oriented description.
    #[serde(default)]
    pub description: String,
    /// Version string, informational only.
    #[serde(default)]
    pub version: String,
}

/// The package catalog: a share base and the packages it serves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// UNC path of the primary file share root.
    #[serde(default)]
    pub share_base: String,
    /// All packages this endpoint may manage.
    #[serde(default)]
    pub packages: Vec<PackageDescriptor>,
}

impl Catalog {
    /// Look up a package by exact name.
    pub fn find(&self, name: &str) -> Option<&PackageDescriptor> {
        self.packages.iter().find(|pkg| pkg.name == name)
    }
}

// ============================================================================
// Resolution results
// ============================================================================

/// Where a resolved artifact ultimately came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOrigin {
    /// Extracted from resources compiled into the binary.
    Embedded,
    /// Copied from the given share root.
    Share(PathBuf),
    /// Used in place from the local filesystem.
    Local,
    /// Fetched over HTTP.
    Downloaded,
}

/// An installer file ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// Filesystem path of the runnable artifact.
    pub path: PathBuf,
    /// Which source produced it.
    pub origin: ArtifactOrigin,
}

// ============================================================================
// Operation reports
// ============================================================================

/// Outcome class of a provisioning operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran to completion.
    Success,
    /// The operation was attempted but failed.
    Failed,
    /// The catalog or descriptor made the operation impossible.
    ConfigError,
}

impl Outcome {
    /// Whether this outcome counts as a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Result of one operation on one package.
///
/// Reports carry plain text only. Glyphs and color belong to whatever
/// front end renders them.
#[derive(Debug, Clone)]
pub struct OpReport {
    /// Package the operation targeted.
    pub package: String,
    /// Outcome class.
    pub outcome: Outcome,
    /// Human-readable summary of what happened.
    pub message: String,
}

impl OpReport {
    /// Build a success report.
    pub fn success(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            outcome: Outcome::Success,
            message: message.into(),
        }
    }

    /// Fold an operation result into a report, classifying errors by
    /// category.
    pub fn from_result(package: impl Into<String>, result: Result<String>) -> Self {
        let package = package.into();
        match result {
            Ok(message) => Self {
                package,
                outcome: Outcome::Success,
                message,
            },
            Err(err) => {
                log::warn!(
                    "{} for {}: {}",
                    err.category().description(),
                    package,
                    err
                );
                Self {
                    package,
                    outcome: err.outcome(),
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Installed state of one catalog entry, recomputed on demand.
#[derive(Debug, Clone)]
pub struct PackageStatus {
    /// The catalog descriptor.
    pub package: PackageDescriptor,
    /// Whether detection currently finds it on this machine.
    pub installed: bool,
}

/// Reachability of the primary share root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareStatus {
    /// The share base responded to a filesystem probe.
    Reachable(String),
    /// The share base is empty or did not respond.
    Offline(String),
}

impl ShareStatus {
    /// Whether the share is usable right now.
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable(_))
    }

    /// The configured share base, reachable or not.
    pub fn base(&self) -> &str {
        match self {
            Self::Reachable(base) | Self::Offline(base) => base,
        }
    }
}
