//! Endpoint status: catalog location, share reachability, platform tools.

use anyhow::Result;
use provkit::ShareStatus;

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, catalog: Option<&str>) -> Result<()> {
    let engine = super::build_engine(catalog)?;

    ui::header("Status");
    if ctx.verbose > 0 {
        ui::kv("catalog", &engine.catalog_path().display().to_string());
        ui::kv("scratch", &engine.scratch().path().display().to_string());
    }

    match engine.share_status()? {
        ShareStatus::Reachable(base) => ui::success(&format!("share reachable: {base}")),
        ShareStatus::Offline(base) if base.is_empty() => {
            ui::warn("no share base configured in the catalog");
        }
        ShareStatus::Offline(base) => ui::warn(&format!("share unreachable: {base}")),
    }

    for tool in ["msiexec", "powershell"] {
        match which::which(tool) {
            Ok(path) => ui::kv(tool, &path.display().to_string()),
            Err(_) => ui::kv(tool, "not found"),
        }
    }

    Ok(())
}
