//! Launch planning and process execution.
//!
//! Every operation on an artifact boils down to an [`Invocation`]: one
//! program, its argument vector, whether the console window is hidden,
//! and whether the caller waits. Builders in this module encode the
//! shapes the fleet has always used:
//!
//! - silent runs call the tool directly with a hidden window
//! - interactive runs go through a visible PowerShell that starts the
//!   tool with `Start-Process ... -Wait`
//! - diagnostics open a console that stays up after the command ends
//!
//! Execution sits behind the [`Launcher`] trait so the orchestrator can
//! be exercised without spawning real installers.

use std::fmt;
use std::path::Path;
use std::process::{Command, Output, Stdio};

#[cfg(windows)]
use std::os::windows::process::CommandExt;

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

/// Process creation flag that suppresses the console window.
#[cfg(windows)]
pub(crate) const CREATE_NO_WINDOW: u32 = 0x0800_0000;

// ============================================================================
// Classification
// ============================================================================

/// Installer technology, decided by file extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Technology {
    /// Windows Installer package, driven through `msiexec`.
    Msi,
    /// PowerShell script.
    Script,
    /// Anything else, treated as a self-contained executable.
    Executable,
}

impl Technology {
    /// Classify a file by its extension, case-insensitively. Unknown and
    /// missing extensions count as executables.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());
        match ext.as_deref() {
            Some("msi") => Self::Msi,
            Some("ps1") => Self::Script,
            _ => Self::Executable,
        }
    }
}

/// Whether the operator sees the installer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Hidden window, unattended switches do the work.
    Silent,
    /// Visible window for installers that need a human.
    Interactive,
}

impl Visibility {
    /// Visibility from the descriptor's interactive flag.
    pub fn from_flag(interactive: bool) -> Self {
        if interactive {
            Self::Interactive
        } else {
            Self::Silent
        }
    }

    /// True for [`Visibility::Interactive`].
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// Whether the caller blocks on the launched process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Block until the process exits and collect its output.
    Wait,
    /// Fire and forget. Used only for diagnostic consoles.
    Spawn,
}

/// Names of the host tools invocations are built on. Only the outer
/// process is configurable; command text woven into a PowerShell
/// `Start-Process` call always names the stock Windows tools.
#[derive(Debug, Clone)]
pub struct ToolPrograms {
    /// Windows Installer driver.
    pub msi_tool: String,
    /// Shell used for scripts and interactive wrapping.
    pub shell: String,
}

impl Default for ToolPrograms {
    fn default() -> Self {
        Self {
            msi_tool: "msiexec".to_string(),
            shell: "powershell".to_string(),
        }
    }
}

// ============================================================================
// Invocations
// ============================================================================

/// A fully planned process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to start.
    pub program: String,
    /// Argument vector.
    pub args: Vec<String>,
    /// Suppress the console window.
    pub hide_window: bool,
    /// Block or fire-and-forget.
    pub wait: WaitMode,
}

impl Invocation {
    fn hidden(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            hide_window: true,
            wait: WaitMode::Wait,
        }
    }

    fn visible(program: impl Into<String>, args: Vec<String>, wait: WaitMode) -> Self {
        Self {
            program: program.into(),
            args,
            hide_window: false,
            wait,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Render arguments as a PowerShell `-ArgumentList` literal:
/// single-quoted, comma-separated.
fn quote_list(args: &[String]) -> String {
    format!("'{}'", args.join("','"))
}

// ============================================================================
// Builders
// ============================================================================

/// Plan an installation of `artifact` with the descriptor's arguments.
pub fn install_invocation(
    artifact: &Path,
    args: &[String],
    visibility: Visibility,
    programs: &ToolPrograms,
) -> Invocation {
    match visibility {
        Visibility::Silent => silent_install(artifact, args, programs),
        Visibility::Interactive => interactive_install(artifact, args, programs),
    }
}

fn silent_install(artifact: &Path, args: &[String], programs: &ToolPrograms) -> Invocation {
    let path = path_str(artifact);
    match Technology::from_path(artifact) {
        Technology::Script => {
            let mut argv = vec![
                "-NoProfile".to_string(),
                "-ExecutionPolicy".to_string(),
                "Bypass".to_string(),
                "-File".to_string(),
                path,
            ];
            argv.extend(args.iter().cloned());
            Invocation::hidden(&programs.shell, argv)
        }
        Technology::Msi => {
            let mut argv = vec!["/i".to_string(), path];
            argv.extend(args.iter().cloned());
            Invocation::hidden(&programs.msi_tool, argv)
        }
        Technology::Executable => Invocation::hidden(path, args.to_vec()),
    }
}

fn interactive_install(artifact: &Path, args: &[String], programs: &ToolPrograms) -> Invocation {
    let path = path_str(artifact);
    let ps_command = match Technology::from_path(artifact) {
        Technology::Script => {
            let mut list = vec![
                "-NoExit".to_string(),
                "-ExecutionPolicy".to_string(),
                "Bypass".to_string(),
                "-File".to_string(),
                path,
            ];
            list.extend(args.iter().cloned());
            format!(
                "Start-Process powershell.exe -ArgumentList {} -Wait",
                quote_list(&list)
            )
        }
        Technology::Msi => {
            let mut list = vec!["/i".to_string(), path];
            list.extend(args.iter().cloned());
            format!(
                "Start-Process msiexec.exe -ArgumentList {} -Wait",
                quote_list(&list)
            )
        }
        Technology::Executable if args.is_empty() => {
            format!("Start-Process '{path}' -Wait")
        }
        Technology::Executable => {
            format!(
                "Start-Process '{path}' -ArgumentList {} -Wait",
                quote_list(args)
            )
        }
    };
    Invocation::visible(
        &programs.shell,
        vec!["-NoProfile".to_string(), "-Command".to_string(), ps_command],
        WaitMode::Wait,
    )
}

/// Plan an MSI removal driven by the original installer file.
pub fn msi_uninstall_invocation(
    installer: &Path,
    args: &[String],
    visibility: Visibility,
    programs: &ToolPrograms,
) -> Invocation {
    let mut argv = vec!["/x".to_string(), path_str(installer)];
    argv.extend(args.iter().cloned());
    Invocation {
        program: programs.msi_tool.clone(),
        args: argv,
        hide_window: !visibility.is_interactive(),
        wait: WaitMode::Wait,
    }
}

/// Plan a run of an extracted embedded script in a visible console.
pub fn embedded_script_invocation(
    script: &Path,
    args: &[String],
    wait: WaitMode,
    programs: &ToolPrograms,
) -> Invocation {
    let mut list = vec![
        "-NoExit".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-File".to_string(),
        path_str(script),
    ];
    list.extend(args.iter().cloned());
    let ps_command = format!(
        "Start-Process powershell.exe -ArgumentList {} -Wait",
        quote_list(&list)
    );
    Invocation::visible(
        &programs.shell,
        vec!["-NoProfile".to_string(), "-Command".to_string(), ps_command],
        wait,
    )
}

/// Plan a removal described by a raw command line. The line is expanded
/// and split before dispatch; an unusable line is a configuration error.
pub fn command_line_invocation(
    raw: &str,
    visibility: Visibility,
    programs: &ToolPrograms,
) -> Result<Invocation> {
    let expanded = expand_env(raw);
    let (program, argv) =
        split_command_line(&expanded).ok_or_else(|| Error::InvalidCommandLine {
            line: expanded.clone(),
        })?;
    let invocation = match visibility {
        Visibility::Interactive => {
            let ps_command = if program.to_lowercase().ends_with(".ps1") {
                let mut list = vec![
                    "-NoExit".to_string(),
                    "-ExecutionPolicy".to_string(),
                    "Bypass".to_string(),
                    "-File".to_string(),
                    program,
                ];
                list.extend(argv);
                format!(
                    "Start-Process powershell.exe -ArgumentList {} -Wait",
                    quote_list(&list)
                )
            } else if argv.is_empty() {
                format!("Start-Process '{program}' -Wait")
            } else {
                format!(
                    "Start-Process '{program}' -ArgumentList {} -Wait",
                    quote_list(&argv)
                )
            };
            // The outer shell gets its own -NoExit so the operator's
            // console stays open after the removal returns.
            Invocation::visible(
                &programs.shell,
                vec![
                    "-NoProfile".to_string(),
                    "-NoExit".to_string(),
                    "-Command".to_string(),
                    ps_command,
                ],
                WaitMode::Wait,
            )
        }
        Visibility::Silent => {
            if program.to_lowercase().ends_with(".ps1") {
                let mut list = vec![
                    "-NoProfile".to_string(),
                    "-ExecutionPolicy".to_string(),
                    "Bypass".to_string(),
                    "-File".to_string(),
                    program,
                ];
                list.extend(argv);
                Invocation::hidden(&programs.shell, list)
            } else {
                Invocation::hidden(program, argv)
            }
        }
    };
    Ok(invocation)
}

/// Plan a diagnostic console around a raw command line. The console is
/// always visible and is never waited on.
pub fn diagnostic_invocation(raw: &str, programs: &ToolPrograms) -> Invocation {
    let expanded = expand_env(raw);
    let list = vec![
        "-NoExit".to_string(),
        "-NoProfile".to_string(),
        "-Command".to_string(),
        expanded,
    ];
    let ps_command = format!(
        "Start-Process powershell.exe -ArgumentList {} -Wait",
        quote_list(&list)
    );
    Invocation::visible(
        &programs.shell,
        vec!["-NoProfile".to_string(), "-Command".to_string(), ps_command],
        WaitMode::Spawn,
    )
}

// ============================================================================
// Command-line helpers
// ============================================================================

/// Expand `$VAR` and `${VAR}` references against the process
/// environment. Unset variables expand to nothing.
pub fn expand_env(input: &str) -> String {
    shellexpand::env_with_context_no_errors(input, |var| {
        Some(std::env::var(var).unwrap_or_default())
    })
    .into_owned()
}

/// Split a raw command line into a program and its arguments. A leading
/// double quote delimits a program path containing spaces; everything
/// else splits on whitespace. Returns `None` for an empty program or an
/// unterminated quote.
pub fn split_command_line(line: &str) -> Option<(String, Vec<String>)> {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix('"') {
        let end = rest.find('"')?;
        if end == 0 {
            return None;
        }
        let program = rest[..end].to_string();
        let argv = rest[end + 1..]
            .split_whitespace()
            .map(str::to_string)
            .collect();
        return Some((program, argv));
    }
    let mut parts = trimmed.split_whitespace();
    let program = parts.next()?.to_string();
    Some((program, parts.map(str::to_string).collect()))
}

// ============================================================================
// Launchers
// ============================================================================

/// Output collected from a waited-on process. Empty for spawned ones.
#[derive(Debug, Clone, Default)]
pub struct LaunchOutput {
    /// Combined stdout and stderr.
    pub output: String,
}

/// Executes planned invocations.
pub trait Launcher: Send + Sync {
    /// Run the invocation, honoring its window and wait settings.
    fn launch(&self, invocation: &Invocation) -> Result<LaunchOutput>;
}

/// Launcher backed by real OS processes.
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<LaunchOutput> {
        log::debug!("launching: {invocation}");
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        #[cfg(windows)]
        if invocation.hide_window {
            command.creation_flags(CREATE_NO_WINDOW);
        }
        match invocation.wait {
            WaitMode::Wait => {
                let output = command.output().map_err(|err| Error::Launch {
                    program: invocation.program.clone(),
                    source: err,
                })?;
                let combined = combine_output(&output);
                if output.status.success() {
                    Ok(LaunchOutput { output: combined })
                } else {
                    Err(Error::CommandFailed {
                        message: format!("{} exited with {}", invocation.program, output.status),
                        output: combined,
                    })
                }
            }
            WaitMode::Spawn => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
                command.spawn().map_err(|err| Error::Launch {
                    program: invocation.program.clone(),
                    source: err,
                })?;
                Ok(LaunchOutput::default())
            }
        }
    }
}

fn combine_output(output: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout)
        .trim_end()
        .to_string();
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim_end();
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(stderr);
    }
    combined
}

/// Launcher that records invocations instead of running them.
///
/// ```
/// use provkit::dispatch::{Invocation, Launcher, MockLauncher, WaitMode};
///
/// let mock = MockLauncher::new();
/// mock.fail_when("msiexec", "installer rolled back");
/// let invocation = Invocation {
///     program: "msiexec".to_string(),
///     args: vec!["/i".to_string(), "app.msi".to_string()],
///     hide_window: true,
///     wait: WaitMode::Wait,
/// };
/// assert!(mock.launch(&invocation).is_err());
/// assert_eq!(mock.launch_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockLauncher {
    launches: Arc<Mutex<Vec<Invocation>>>,
    failures: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockLauncher {
    /// New mock that accepts every launch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any invocation whose rendered command contains `pattern`.
    pub fn fail_when(&self, pattern: impl Into<String>, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .push((pattern.into(), message.into()));
    }

    /// Everything launched so far, in order.
    pub fn launches(&self) -> Vec<Invocation> {
        self.launches.lock().unwrap().clone()
    }

    /// Number of launches so far.
    pub fn launch_count(&self) -> usize {
        self.launches.lock().unwrap().len()
    }
}

impl Launcher for MockLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<LaunchOutput> {
        self.launches.lock().unwrap().push(invocation.clone());
        let rendered = invocation.to_string();
        for (pattern, message) in self.failures.lock().unwrap().iter() {
            if rendered.contains(pattern.as_str()) {
                return Err(Error::CommandFailed {
                    message: message.clone(),
                    output: String::new(),
                });
            }
        }
        Ok(LaunchOutput::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn with_env_var<T>(key: &str, value: &str, f: impl FnOnce() -> T) -> T {
        // SAFETY: set_var races other threads reading the environment;
        // every test here uses a variable name unique to that test.
        unsafe { env::set_var(key, value) };
        let result = f();
        unsafe { env::remove_var(key) };
        result
    }

    #[test]
    fn test_technology_from_extension() {
        assert_eq!(Technology::from_path(Path::new("a\\b.msi")), Technology::Msi);
        assert_eq!(Technology::from_path(Path::new("b.MSI")), Technology::Msi);
        assert_eq!(Technology::from_path(Path::new("fix.ps1")), Technology::Script);
        assert_eq!(
            Technology::from_path(Path::new("setup.exe")),
            Technology::Executable
        );
        assert_eq!(
            Technology::from_path(Path::new("installer")),
            Technology::Executable
        );
    }

    #[test]
    fn test_silent_msi_install_shape() {
        let inv = install_invocation(
            Path::new("C:\\stage\\7-Zip.msi"),
            &["/quiet".to_string(), "/norestart".to_string()],
            Visibility::Silent,
            &ToolPrograms::default(),
        );
        assert_eq!(inv.program, "msiexec");
        assert_eq!(inv.args, ["/i", "C:\\stage\\7-Zip.msi", "/quiet", "/norestart"]);
        assert!(inv.hide_window);
        assert_eq!(inv.wait, WaitMode::Wait);
    }

    #[test]
    fn test_silent_script_install_shape() {
        let inv = install_invocation(
            Path::new("C:\\stage\\setup.ps1"),
            &["-Mode".to_string(), "full".to_string()],
            Visibility::Silent,
            &ToolPrograms::default(),
        );
        assert_eq!(inv.program, "powershell");
        assert_eq!(
            inv.args,
            [
                "-NoProfile",
                "-ExecutionPolicy",
                "Bypass",
                "-File",
                "C:\\stage\\setup.ps1",
                "-Mode",
                "full"
            ]
        );
        assert!(inv.hide_window);
    }

    #[test]
    fn test_silent_exe_install_runs_directly() {
        let inv = install_invocation(
            Path::new("C:\\stage\\tool.exe"),
            &["/S".to_string()],
            Visibility::Silent,
            &ToolPrograms::default(),
        );
        assert_eq!(inv.program, "C:\\stage\\tool.exe");
        assert_eq!(inv.args, ["/S"]);
        assert!(inv.hide_window);
    }

    #[test]
    fn test_interactive_msi_install_wraps_start_process() {
        let inv = install_invocation(
            Path::new("C:\\stage\\app.msi"),
            &["/qb".to_string()],
            Visibility::Interactive,
            &ToolPrograms::default(),
        );
        assert_eq!(inv.program, "powershell");
        assert_eq!(inv.args.len(), 3);
        assert_eq!(inv.args[0], "-NoProfile");
        assert_eq!(inv.args[1], "-Command");
        assert_eq!(
            inv.args[2],
            "Start-Process msiexec.exe -ArgumentList '/i','C:\\stage\\app.msi','/qb' -Wait"
        );
        assert!(!inv.hide_window);
        assert_eq!(inv.wait, WaitMode::Wait);
    }

    #[test]
    fn test_interactive_script_install_keeps_console_open() {
        let inv = install_invocation(
            Path::new("C:\\stage\\fix.ps1"),
            &["-Clean".to_string()],
            Visibility::Interactive,
            &ToolPrograms::default(),
        );
        assert_eq!(
            inv.args[2],
            "Start-Process powershell.exe -ArgumentList \
             '-NoExit','-ExecutionPolicy','Bypass','-File','C:\\stage\\fix.ps1','-Clean' -Wait"
        );
    }

    #[test]
    fn test_interactive_exe_without_args_has_no_argument_list() {
        let inv = install_invocation(
            Path::new("C:\\stage\\tool.exe"),
            &[],
            Visibility::Interactive,
            &ToolPrograms::default(),
        );
        assert_eq!(inv.args[2], "Start-Process 'C:\\stage\\tool.exe' -Wait");
    }

    #[test]
    fn test_msi_uninstall_puts_target_first() {
        let inv = msi_uninstall_invocation(
            Path::new("C:\\stage\\7-Zip.msi"),
            &["/quiet".to_string()],
            Visibility::Silent,
            &ToolPrograms::default(),
        );
        assert_eq!(inv.program, "msiexec");
        assert_eq!(inv.args, ["/x", "C:\\stage\\7-Zip.msi", "/quiet"]);
        assert!(inv.hide_window);
        assert_eq!(inv.wait, WaitMode::Wait);
    }

    #[test]
    fn test_msi_uninstall_interactive_shows_window() {
        let inv = msi_uninstall_invocation(
            Path::new("C:\\stage\\7-Zip.msi"),
            &[],
            Visibility::Interactive,
            &ToolPrograms::default(),
        );
        assert!(!inv.hide_window);
        assert_eq!(inv.wait, WaitMode::Wait);
    }

    #[test]
    fn test_embedded_script_invocation_shape() {
        let inv = embedded_script_invocation(
            Path::new("C:\\stage\\stack-bootstrap.ps1"),
            &["-Restart".to_string()],
            WaitMode::Wait,
            &ToolPrograms::default(),
        );
        assert_eq!(inv.program, "powershell");
        assert_eq!(inv.args[0], "-NoProfile");
        assert_eq!(inv.args[1], "-Command");
        assert_eq!(
            inv.args[2],
            "Start-Process powershell.exe -ArgumentList \
             '-NoExit','-ExecutionPolicy','Bypass','-File','C:\\stage\\stack-bootstrap.ps1',\
'-Restart' -Wait"
        );
        assert!(!inv.hide_window);
    }

    #[test]
    fn test_command_line_interactive_gets_outer_noexit() {
        let inv = command_line_invocation(
            "\"C:\\Program Files\\App\\unins000.exe\" /SILENT",
            Visibility::Interactive,
            &ToolPrograms::default(),
        )
        .unwrap();
        assert_eq!(inv.program, "powershell");
        assert_eq!(inv.args[0], "-NoProfile");
        assert_eq!(inv.args[1], "-NoExit");
        assert_eq!(inv.args[2], "-Command");
        assert_eq!(
            inv.args[3],
            "Start-Process 'C:\\Program Files\\App\\unins000.exe' -ArgumentList '/SILENT' -Wait"
        );
        assert_eq!(inv.wait, WaitMode::Wait);
        assert!(!inv.hide_window);
    }

    #[test]
    fn test_command_line_silent_runs_directly_and_blocks() {
        let inv = command_line_invocation(
            "\"C:\\Program Files\\App\\unins000.exe\" /SILENT /NORESTART",
            Visibility::Silent,
            &ToolPrograms::default(),
        )
        .unwrap();
        assert_eq!(inv.program, "C:\\Program Files\\App\\unins000.exe");
        assert_eq!(inv.args, ["/SILENT", "/NORESTART"]);
        assert!(inv.hide_window);
        assert_eq!(inv.wait, WaitMode::Wait);
    }

    #[test]
    fn test_command_line_silent_script_goes_through_shell() {
        let inv = command_line_invocation(
            "cleanup.ps1 -Purge",
            Visibility::Silent,
            &ToolPrograms::default(),
        )
        .unwrap();
        assert_eq!(inv.program, "powershell");
        assert_eq!(
            inv.args,
            ["-NoProfile", "-ExecutionPolicy", "Bypass", "-File", "cleanup.ps1", "-Purge"]
        );
    }

    #[test]
    fn test_command_line_rejects_empty_quoted_program() {
        let err = command_line_invocation(
            "\"\" /SILENT",
            Visibility::Silent,
            &ToolPrograms::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidCommandLine { .. }));
    }

    #[test]
    fn test_diagnostic_invocation_spawns_persistent_console() {
        let inv = diagnostic_invocation("ping localhost", &ToolPrograms::default());
        assert_eq!(inv.program, "powershell");
        assert_eq!(inv.args[0], "-NoProfile");
        assert_eq!(inv.args[1], "-Command");
        assert_eq!(
            inv.args[2],
            "Start-Process powershell.exe -ArgumentList \
             '-NoExit','-NoProfile','-Command','ping localhost' -Wait"
        );
        assert!(!inv.hide_window);
        assert_eq!(inv.wait, WaitMode::Spawn);
    }

    #[test]
    fn test_split_command_line_quoted_program() {
        let (program, argv) =
            split_command_line("\"C:\\Program Files\\x\\un.exe\" /S /D").unwrap();
        assert_eq!(program, "C:\\Program Files\\x\\un.exe");
        assert_eq!(argv, ["/S", "/D"]);
    }

    #[test]
    fn test_split_command_line_plain() {
        let (program, argv) = split_command_line("msiexec /x {GUID}  /quiet").unwrap();
        assert_eq!(program, "msiexec");
        assert_eq!(argv, ["/x", "{GUID}", "/quiet"]);
    }

    #[test]
    fn test_split_command_line_rejects_bad_input() {
        assert!(split_command_line("").is_none());
        assert!(split_command_line("   ").is_none());
        assert!(split_command_line("\"\" /S").is_none());
        assert!(split_command_line("\"no closing quote").is_none());
    }

    #[test]
    fn test_expand_env_both_forms() {
        with_env_var("ROLLOUT_TEST_APPDIR", "C:\\Apps", || {
            assert_eq!(
                expand_env("$ROLLOUT_TEST_APPDIR\\un.exe /S"),
                "C:\\Apps\\un.exe /S"
            );
            assert_eq!(
                expand_env("${ROLLOUT_TEST_APPDIR}\\un.exe"),
                "C:\\Apps\\un.exe"
            );
        });
    }

    #[test]
    fn test_expand_env_unset_becomes_empty() {
        assert_eq!(expand_env("$ROLLOUT_TEST_UNSET_VAR\\un.exe"), "\\un.exe");
    }

    #[test]
    fn test_mock_launcher_records_in_order() {
        let mock = MockLauncher::new();
        let first = install_invocation(
            Path::new("a.msi"),
            &[],
            Visibility::Silent,
            &ToolPrograms::default(),
        );
        let second = install_invocation(
            Path::new("b.exe"),
            &[],
            Visibility::Silent,
            &ToolPrograms::default(),
        );
        mock.launch(&first).unwrap();
        mock.launch(&second).unwrap();
        let seen = mock.launches();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].program, "msiexec");
        assert_eq!(seen[1].program, "b.exe");
    }

    #[test]
    fn test_mock_launcher_failure_patterns() {
        let mock = MockLauncher::new();
        mock.fail_when("b.exe", "exit code 2");
        let good = install_invocation(
            Path::new("a.exe"),
            &[],
            Visibility::Silent,
            &ToolPrograms::default(),
        );
        let bad = install_invocation(
            Path::new("b.exe"),
            &[],
            Visibility::Silent,
            &ToolPrograms::default(),
        );
        assert!(mock.launch(&good).is_ok());
        let err = mock.launch(&bad).unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
        assert_eq!(mock.launch_count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_process_launcher_collects_output() {
        let inv = Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo hi".to_string()],
            hide_window: false,
            wait: WaitMode::Wait,
        };
        let out = ProcessLauncher.launch(&inv).unwrap();
        assert_eq!(out.output, "hi");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_launcher_maps_exit_failure() {
        let inv = Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo oops >&2; exit 3".to_string()],
            hide_window: true,
            wait: WaitMode::Wait,
        };
        let err = ProcessLauncher.launch(&inv).unwrap_err();
        match err {
            Error::CommandFailed { output, .. } => assert_eq!(output, "oops"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_process_launcher_missing_program() {
        let inv = Invocation {
            program: "definitely-not-a-real-program-rollout".to_string(),
            args: vec![],
            hide_window: false,
            wait: WaitMode::Wait,
        };
        let err = ProcessLauncher.launch(&inv).unwrap_err();
        assert!(matches!(err, Error::Launch { .. }));
    }
}
