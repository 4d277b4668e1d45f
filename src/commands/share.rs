//! Connect and disconnect the deployment share.
//!
//! Connections go through Windows credential plumbing: `net use` with
//! prompted credentials on connect, `cmdkey /delete` plus a blanket
//! `net use * /delete` on disconnect. Nothing is persisted; a connection
//! lasts until sign-out.

use anyhow::{Result, bail};
use dialoguer::{Input, Password};

use crate::runner;
use crate::ui;

/// Pick the share root to operate on: the explicit flag wins, otherwise
/// the catalog's share base.
fn resolve_root(root: Option<&str>, catalog: Option<&str>) -> Result<String> {
    if let Some(root) = root {
        return Ok(root.to_string());
    }
    let engine = super::build_engine(catalog)?;
    let base = engine.share_status()?.base().to_string();
    if base.is_empty() {
        bail!("no share root given and the catalog has no share base");
    }
    Ok(base)
}

pub fn connect(root: Option<&str>, catalog: Option<&str>) -> Result<()> {
    let root = resolve_root(root, catalog)?;
    if !cfg!(windows) {
        bail!("share connections are managed through Windows credentials");
    }

    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;

    ui::info(&format!("connecting {root} as {username}"));
    let command =
        format!("net use \"{root}\" \"{password}\" /user:\"{username}\" /persistent:no");
    let output = runner::run_capture("powershell", &["-Command", &command])?;
    if !output.is_empty() {
        ui::dim(&output);
    }
    ui::success(&format!("connected {root}"));
    Ok(())
}

pub fn disconnect(root: Option<&str>, catalog: Option<&str>) -> Result<()> {
    let root = resolve_root(root, catalog)?;
    if !cfg!(windows) {
        bail!("share connections are managed through Windows credentials");
    }

    let server = server_of(&root);
    if server.is_empty() {
        bail!("cannot determine server from share root: {root}");
    }

    let script = format!("cmdkey /delete:{server} 2>$null; net use * /delete /y 2>$null");
    match runner::run_capture("powershell", &["-Command", &script]) {
        Ok(output) if !output.is_empty() => ui::dim(&output),
        Ok(_) => {}
        Err(err) => log::debug!("credential cleanup reported: {err}"),
    }

    if std::path::Path::new(&root).exists() {
        ui::warn(&format!("share still reachable: {root}"));
    } else {
        ui::success(&format!("disconnected {root}"));
    }
    Ok(())
}

/// Server component of a UNC path like `\\server\share`.
fn server_of(root: &str) -> &str {
    root.trim_start_matches('\\')
        .split('\\')
        .next()
        .unwrap_or("")
}
