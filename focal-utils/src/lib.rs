//! Common helpers shared across focalcrop crates.

/// JSON settings for every pipeline stage.
pub mod config;
/// Image loading, resizing, and grayscale conversion.
pub mod image_utils;
/// Image output helpers (format inference, encoding).
pub mod output;
/// 2D point arithmetic used by the focal point estimators.
pub mod point;
/// Opt-in stage timings.
pub mod telemetry;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;

pub use config::AppSettings;
pub use image_utils::{load_image, resize_image, to_grayscale};
pub use output::{ImageFormatHint, save_image};
pub use point::Point;
pub use telemetry::{TimingGuard, configure as configure_telemetry, timing_guard};

/// Install the process-wide `env_logger` backend.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies. Timing lines on
/// the telemetry target always pass the logger filter and are gated by
/// [`telemetry::configure`] instead. Calling this twice is harmless.
pub fn init_logging(default_filter: LevelFilter) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or(default_filter.as_str());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .filter_module(telemetry::TELEMETRY_TARGET, LevelFilter::Trace)
        .try_init();
    Ok(())
}

/// Resolve `path` to an absolute path, failing if nothing exists there.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    anyhow::ensure!(path.exists(), "path does not exist: {}", path.display());
    path.canonicalize()
        .with_context(|| format!("failed to resolve {}", path.display()))
}
