//! Package operations: install, bulk install, uninstall, diagnostics.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use provkit::{BulkProgress, OpReport};

use crate::Context;
use crate::ui;

pub fn install(name: &str, catalog: Option<&str>) -> Result<()> {
    let engine = super::build_engine(catalog)?;
    finish(engine.install(name))
}

pub fn uninstall(name: &str, catalog: Option<&str>) -> Result<()> {
    let engine = super::build_engine(catalog)?;
    finish(engine.uninstall(name))
}

pub fn test(name: &str, catalog: Option<&str>) -> Result<()> {
    let engine = super::build_engine(catalog)?;
    finish(engine.test(name))
}

/// Render a single report and exit non-zero on anything but success.
fn finish(report: OpReport) -> Result<()> {
    ui::report(&report);
    if !report.outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Adapter feeding bulk progress into an indicatif bar.
struct BarProgress {
    bar: ProgressBar,
}

impl BulkProgress for BarProgress {
    fn package_started(&mut self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn package_finished(&mut self, _index: usize, _total: usize, _report: &OpReport) {
        self.bar.inc(1);
    }
}

pub fn bulk(ctx: &Context, names: &[String], catalog: Option<&str>) -> Result<()> {
    let engine = super::build_engine(catalog)?;

    let reports = if ctx.quiet {
        engine.bulk_install(names)
    } else {
        let bar = ProgressBar::new(names.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        let mut progress = BarProgress { bar: bar.clone() };
        let reports = engine.bulk_install_with_progress(names, &mut progress);
        bar.finish_and_clear();
        reports
    };

    for report in &reports {
        ui::report(report);
    }

    let failed = reports
        .iter()
        .filter(|report| !report.outcome.is_success())
        .count();
    if failed > 0 {
        ui::warn(&format!(
            "{failed} of {} packages did not install",
            reports.len()
        ));
        std::process::exit(1);
    }
    ui::success(&format!("{} packages installed", reports.len()));
    Ok(())
}
