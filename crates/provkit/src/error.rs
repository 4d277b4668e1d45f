//! Error types for provisioning operations.
//!
//! Errors are categorized so the orchestrator can map every failure onto
//! one of the report outcome classes without matching on individual
//! variants. Each error carries enough context to tell the operator what
//! was missing or what command misbehaved.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::Outcome;

/// Categories of provisioning errors.
///
/// Categories decide how an operation result is classified: missing or
/// misconfigured catalog entries are reported differently from transport
/// and installer failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Package or artifact could not be located anywhere.
    NotFound,
    /// The catalog or a descriptor is unusable as written.
    Configuration,
    /// Network-related errors during download.
    Transport,
    /// An installer process failed to launch or exited non-zero.
    Execution,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Report outcome class for this category.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::NotFound | Self::Configuration => Outcome::ConfigError,
            Self::Transport | Self::Execution | Self::Other => Outcome::Failed,
        }
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NotFound => "Package or artifact not found",
            Self::Configuration => "Catalog configuration problem",
            Self::Transport => "Network connectivity issue",
            Self::Execution => "Installer execution failed",
            Self::Other => "Unexpected error",
        }
    }
}

/// Errors that can occur during provisioning operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Package not present in the catalog
    #[error("package not found in catalog: {name}")]
    PackageNotFound {
        /// Name that was looked up
        name: String,
    },

    /// Every source in the resolution chain came up empty
    #[error(
        "no installer for {name}: '{share_path}' not found on any share root and no download URL configured"
    )]
    ArtifactNotFound {
        /// Package being resolved
        name: String,
        /// Share-relative path that was probed
        share_path: String,
    },

    /// An embedded descriptor's resource could not be produced
    #[error("embedded resource '{resource}' for {name} could not be extracted")]
    EmbeddedMissing {
        /// Package being resolved
        name: String,
        /// Resource name the descriptor points at
        resource: String,
    },

    /// The original MSI installer is needed for removal but is gone
    #[error("MSI installer for {name} not found on the share or in the scratch directory")]
    InstallerUnavailable {
        /// Package being removed
        name: String,
    },

    /// Descriptor lacks the arguments this operation needs
    #[error("no {what} configured for {name}")]
    NotConfigured {
        /// Package the operation targeted
        name: String,
        /// What was missing (e.g. "uninstall arguments")
        what: &'static str,
    },

    /// A raw command line could not be split into a program and arguments
    #[error("invalid command line: {line:?}")]
    InvalidCommandLine {
        /// The offending command line after expansion
        line: String,
    },

    /// Catalog file missing or unreadable
    #[error("cannot load catalog {path}: {message}")]
    Catalog {
        /// Path the load was attempted from
        path: PathBuf,
        /// Underlying failure
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    Transport {
        /// Error message
        message: String,
        /// HTTP status code if available
        status: Option<u16>,
    },

    /// Download started but did not complete
    #[error("download failed for {url}: {message}")]
    Download {
        /// Source URL
        url: String,
        /// Error message
        message: String,
    },

    /// A process could not be started at all
    #[error("failed to launch {program}: {source}")]
    Launch {
        /// Program that was invoked
        program: String,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// A launched process exited with a failure status
    #[error("command failed: {message}")]
    CommandFailed {
        /// Description of what failed
        message: String,
        /// Combined stdout and stderr of the failed command
        output: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the error category for outcome classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::PackageNotFound { .. }
            | Error::ArtifactNotFound { .. }
            | Error::EmbeddedMissing { .. }
            | Error::InstallerUnavailable { .. } => ErrorCategory::NotFound,
            Error::NotConfigured { .. }
            | Error::InvalidCommandLine { .. }
            | Error::Catalog { .. }
            | Error::Json(_) => ErrorCategory::Configuration,
            Error::Transport { .. } | Error::Download { .. } => ErrorCategory::Transport,
            Error::Launch { .. } | Error::CommandFailed { .. } => ErrorCategory::Execution,
            Error::Io(_) => ErrorCategory::Other,
        }
    }

    /// Report outcome class for this error.
    pub fn outcome(&self) -> Outcome {
        self.category().outcome()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Transport {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Transport {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, Error>;
