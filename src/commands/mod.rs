pub mod install;
pub mod list;
pub mod share;
pub mod status;

use anyhow::Result;
use provkit::Provisioner;
use provkit::detect::{Detector, DetectorConfig};
use provkit::locate::LocatorConfig;
use provkit::scratch::ScratchDir;

use crate::paths;
use crate::settings::Settings;

/// Build the provisioning engine from settings, the environment, and the
/// optional `--catalog` override.
pub fn build_engine(catalog_override: Option<&str>) -> Result<Provisioner> {
    let settings = Settings::load()?;

    let catalog_path = match catalog_override {
        Some(path) => paths::expand(path),
        None => paths::catalog_path(),
    };

    let locator_config = LocatorConfig {
        alternate_roots: settings
            .alternate_share_roots
            .iter()
            .map(|root| paths::expand(root))
            .collect(),
        ..LocatorConfig::default()
    };

    let mut detector_config = DetectorConfig::default();
    for (name, files) in &settings.known_files {
        detector_config
            .known_files
            .entry(name.clone())
            .or_default()
            .extend(files.iter().cloned());
    }

    let mut engine = Provisioner::new(catalog_path)
        .with_locator_config(locator_config)
        .with_detector(Detector::new(detector_config));

    let scratch = paths::scratch_override()
        .or_else(|| settings.scratch_dir.as_deref().map(paths::expand));
    if let Some(dir) = scratch {
        engine = engine.with_scratch(ScratchDir::at(dir));
    }

    Ok(engine)
}
