//! Installed-software detection.
//!
//! Detection is a chain of cheap heuristics, tried in order:
//!
//! 1. A Windows service probe for the few packages that register one.
//! 2. A table of well-known file locations under the standard install
//!    roots.
//! 3. A generic scan for a folder whose name contains the package name,
//!    provided the folder actually holds an executable.
//!
//! Detection answers yes or no and never fails: an unreadable root or a
//! failing probe just counts as "not installed here".

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

use walkdir::WalkDir;

/// Subfolders the executable check descends into, by exact name.
pub const NESTED_BIN_DIRS: &[&str] = &["bin", "app", "Application"];

/// Where and what the detector looks for.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Install roots to search.
    pub roots: Vec<PathBuf>,
    /// Known file locations per package, relative to any root.
    pub known_files: BTreeMap<String, Vec<String>>,
    /// Windows service name per package, probed before any file check.
    pub service_names: BTreeMap<String, String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            known_files: known_files_table(),
            service_names: service_names_table(),
        }
    }
}

fn default_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from(
            env::var("ProgramFiles").unwrap_or_else(|_| "C:\\Program Files".to_string()),
        ),
        PathBuf::from(
            env::var("ProgramFiles(x86)")
                .unwrap_or_else(|_| "C:\\Program Files (x86)".to_string()),
        ),
    ];
    if let Ok(local) = env::var("LOCALAPPDATA") {
        roots.push(PathBuf::from(local).join("Programs"));
    }
    roots
}

fn known_files_table() -> BTreeMap<String, Vec<String>> {
    let entries: &[(&str, &[&str])] = &[
        ("Google Chrome", &["Google\\Chrome\\Application\\chrome.exe"]),
        ("7-Zip", &["7-Zip\\7zFM.exe", "7-Zip\\7z.exe"]),
        ("WinRAR", &["WinRAR\\WinRAR.exe"]),
        ("Notepad++", &["Notepad++\\notepad++.exe"]),
        ("VS Code", &["Microsoft VS Code\\Code.exe"]),
        ("VLC Media", &["VideoLAN\\VLC\\vlc.exe"]),
        ("Lightshot", &["Skillbrains\\lightshot\\Lightshot.exe"]),
        (
            "Adobe Reader",
            &[
                "Adobe\\Acrobat Reader DC\\Reader\\AcroRd32.exe",
                "Adobe\\Reader\\AcroRd32.exe",
            ],
        ),
        ("Firefox", &["Mozilla Firefox\\firefox.exe"]),
        (
            "Java JDK",
            &[
                "Java\\jdk-17\\bin\\java.exe",
                "Java\\jdk-23\\bin\\java.exe",
                "Java\\jdk-23.0.1\\bin\\java.exe",
            ],
        ),
        (
            "TightVNC",
            &["TightVNC\\tvnserver.exe", "TightVNC\\tvnviewer.exe"],
        ),
        ("AnyDesk", &["AnyDesk\\AnyDesk.exe"]),
        ("Git", &["Git\\bin\\git.exe"]),
        ("Node.js", &["nodejs\\node.exe"]),
        ("Python 3", &["Python39\\python.exe", "Python310\\python.exe"]),
        (
            "Docker Desktop",
            &["Docker\\Docker\\resources\\bin\\docker.exe"],
        ),
        ("MongoDB", &["MongoDB\\Server\\7.0\\bin\\mongod.exe"]),
        ("SQLyog", &["SQLyog\\SQLyog.exe"]),
        ("Postman", &["Postman\\Postman.exe"]),
        (
            "RabbitMQ Server",
            &["RabbitMQ Server\\rabbitmq_server-3.11.3\\sbin\\rabbitmqctl.bat"],
        ),
        (
            "ElasticSearch",
            &["Elastic\\Elasticsearch\\8.11.1\\bin\\elasticsearch-service.bat"],
        ),
    ];
    entries
        .iter()
        .map(|(name, files)| {
            (
                (*name).to_string(),
                files.iter().map(|file| (*file).to_string()).collect(),
            )
        })
        .collect()
}

fn service_names_table() -> BTreeMap<String, String> {
    [
        ("RabbitMQ Server", "RabbitMQ"),
        ("ElasticSearch", "elasticsearch"),
    ]
    .iter()
    .map(|(package, service)| ((*package).to_string(), (*service).to_string()))
    .collect()
}

// ============================================================================
// Service probe
// ============================================================================

/// Asks the OS whether a named service is registered.
pub trait ServiceProbe: Send + Sync {
    /// True when the service exists on this machine.
    fn service_exists(&self, service: &str) -> bool;
}

/// Probes services through `Get-Service` in a hidden PowerShell.
pub struct ShellServiceProbe;

impl ServiceProbe for ShellServiceProbe {
    fn service_exists(&self, service: &str) -> bool {
        let command = format!("Get-Service '{service}' -ErrorAction SilentlyContinue");
        let mut cmd = Command::new("powershell");
        cmd.args(["-Command", &command]);
        #[cfg(windows)]
        cmd.creation_flags(crate::dispatch::CREATE_NO_WINDOW);
        match cmd.output() {
            // Get-Service exits zero even for unknown names when errors
            // are suppressed, so the output has to confirm a match.
            Ok(output) => output.status.success() && !output.stdout.is_empty(),
            Err(err) => {
                log::debug!("service probe for {service} failed: {err}");
                false
            }
        }
    }
}

// ============================================================================
// Detector
// ============================================================================

/// Decides whether a package is installed on this machine.
pub struct Detector {
    config: DetectorConfig,
    probe: Box<dyn ServiceProbe>,
}

impl Detector {
    /// Detector using the shell service probe.
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            probe: Box::new(ShellServiceProbe),
        }
    }

    /// Detector with a custom service probe.
    pub fn with_probe(config: DetectorConfig, probe: Box<dyn ServiceProbe>) -> Self {
        Self { config, probe }
    }

    /// The active configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Whether `name` appears to be installed.
    pub fn is_installed(&self, name: &str) -> bool {
        if let Some(service) = self.config.service_names.get(name) {
            if self.probe.service_exists(service) {
                log::debug!("{name} detected via service {service}");
                return true;
            }
        }
        if let Some(candidates) = self.config.known_files.get(name) {
            for rel in candidates {
                for root in &self.config.roots {
                    if join_rel(root, rel).exists() {
                        log::debug!("{name} detected via known file {rel}");
                        return true;
                    }
                }
            }
        }
        self.scan_roots(name)
    }

    /// Look for a folder whose name contains the package name, up to two
    /// levels below each root, and confirm it holds an executable.
    fn scan_roots(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        for root in &self.config.roots {
            if !root.is_dir() {
                continue;
            }
            let walk = WalkDir::new(root)
                .min_depth(1)
                .max_depth(2)
                .into_iter()
                .filter_map(|entry| entry.ok());
            for entry in walk {
                if !entry.file_type().is_dir() {
                    continue;
                }
                let dir_name = entry.file_name().to_string_lossy().to_lowercase();
                if dir_name.contains(&needle) && has_executable(entry.path()) {
                    log::debug!("{name} detected at {}", entry.path().display());
                    return true;
                }
            }
        }
        false
    }
}

/// Join a backslash-style relative path onto a root so the table works
/// on every host.
fn join_rel(root: &Path, rel: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for part in rel.split(['\\', '/']) {
        if !part.is_empty() {
            path.push(part);
        }
    }
    path
}

/// True when the folder holds an `.exe` at the top level or directly
/// inside one of the conventional binary subfolders.
fn has_executable(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    for entry in entries.filter_map(|entry| entry.ok()) {
        let Ok(kind) = entry.file_type() else {
            continue;
        };
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if kind.is_file() && file_name.to_lowercase().ends_with(".exe") {
            return true;
        }
        if kind.is_dir()
            && NESTED_BIN_DIRS.contains(&file_name.as_str())
            && has_exe_at_top(&entry.path())
        {
            return true;
        }
    }
    false
}

fn has_exe_at_top(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries.filter_map(|entry| entry.ok()).any(|entry| {
        entry
            .file_type()
            .map(|kind| kind.is_file())
            .unwrap_or(false)
            && entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .ends_with(".exe")
    })
}
