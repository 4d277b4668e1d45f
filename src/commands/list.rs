//! Catalog listing with freshly computed installed state.

use anyhow::Result;
use colored::Colorize;

use crate::ui;

pub fn run(catalog: Option<&str>) -> Result<()> {
    let engine = super::build_engine(catalog)?;
    let statuses = engine.survey()?;

    ui::header("Catalog");
    if statuses.is_empty() {
        ui::dim("no packages configured");
        return Ok(());
    }

    let mut installed = 0;
    for status in &statuses {
        let marker = if status.installed {
            installed += 1;
            "✓".green()
        } else {
            "·".dimmed()
        };
        let pkg = &status.package;
        let mut line = format!("{} {}", marker, pkg.name);
        if !pkg.version.is_empty() {
            line.push_str(&format!(" {}", pkg.version.dimmed()));
        }
        if !pkg.category.is_empty() {
            line.push_str(&format!("  {}", pkg.category.dimmed()));
        }
        println!("{line}");
    }

    println!();
    ui::dim(&format!("{installed} of {} installed", statuses.len()));
    Ok(())
}
