//! Settings resolution and detector construction for the CLI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use focal_core::{FaceDetector, RustfaceDetector};
use focal_utils::{config::AppSettings, normalize_path};
use log::{info, warn};

use crate::args::CropArgs;

/// Load application settings from a file or use defaults.
pub fn load_settings(config_path: Option<&PathBuf>) -> Result<AppSettings> {
    match config_path {
        Some(path) => {
            let resolved = normalize_path(path)?;
            let settings = AppSettings::load_from_path(&resolved)
                .with_context(|| format!("failed to load settings from {}", resolved.display()))?;
            info!("Loaded settings from {}", resolved.display());
            Ok(settings)
        }
        None => Ok(AppSettings::default()),
    }
}

/// Apply command-line arguments on top of loaded or default settings.
pub fn apply_cli_overrides(settings: &mut AppSettings, args: &CropArgs) {
    if args.telemetry {
        settings.telemetry.enabled = true;
    }
    if let Some(model) = args.model.as_ref() {
        settings.face.model_path = model.display().to_string();
    }
}

/// Build the face detector.
///
/// A model passed on the command line must load. A model that only comes from
/// settings is optional: if it is missing the crop runs on corner features.
pub fn build_face_detector(
    settings: &AppSettings,
    explicit_model: Option<&Path>,
) -> Result<Option<Box<dyn FaceDetector>>> {
    if let Some(model) = explicit_model {
        let resolved = normalize_path(model).context("face model not found")?;
        let detector = RustfaceDetector::load(&resolved, settings.face.clone())?;
        info!("Loaded face model from {}", resolved.display());
        return Ok(Some(Box::new(detector)));
    }

    let configured = Path::new(&settings.face.model_path);
    if !configured.exists() {
        warn!(
            "Face model {} not found; cropping on corner features only",
            configured.display()
        );
        return Ok(None);
    }
    match RustfaceDetector::from_settings(&settings.face) {
        Ok(detector) => {
            info!("Loaded face model from {}", configured.display());
            Ok(Some(Box::new(detector)))
        }
        Err(err) => {
            warn!("{err}; cropping on corner features only");
            Ok(None)
        }
    }
}
