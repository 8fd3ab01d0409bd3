//! Settings shared by the focalcrop crates.
//!
//! The detection thresholds, combiner weights, and resize filter are plain data
//! here so the CLI can load them from JSON and tests can override single fields.
//! Every section falls back to its defaults when missing from the file.

use anyhow::{Context, Result};
use image::imageops::FilterType;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, str::FromStr};

/// Face detector parameters (SeetaFace cascade via `rustface`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaceSettings {
    /// Path to the SeetaFace frontal model.
    pub model_path: String,
    /// Smallest face, in pixels, the detector will report.
    pub min_face_size: u32,
    /// Classifier score a window must reach to count as a face.
    pub score_threshold: f64,
    /// Step between pyramid levels; each level is `1 / scale_factor` of the previous.
    pub scale_factor: f32,
    /// Sliding window stride in pixels (both axes).
    pub window_step: u32,
}

impl Default for FaceSettings {
    fn default() -> Self {
        Self {
            model_path: "models/seeta_fd_frontal_v1.0.bin".to_string(),
            min_face_size: 20,
            score_threshold: 2.0,
            scale_factor: 1.3,
            window_step: 4,
        }
    }
}

/// Corner detector parameters (Shi-Tomasi "good features to track").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureSettings {
    /// Upper bound on the number of corners returned; `0` means unlimited.
    pub max_corners: usize,
    /// Fraction of the strongest corner response a corner must reach.
    pub quality_level: f32,
    /// Minimum Euclidean distance between returned corners.
    pub min_distance: f32,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            max_corners: 25,
            quality_level: 0.3,
            min_distance: 10.0,
        }
    }
}

/// Which detection count drives each estimator's blending weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightMode {
    /// Both weights scale with the corner count.
    #[default]
    FeatureCount,
    /// Each estimator is weighted by its own detection count.
    OwnCount,
}

impl fmt::Display for WeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeightMode::FeatureCount => "feature_count",
            WeightMode::OwnCount => "own_count",
        })
    }
}

impl FromStr for WeightMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "feature_count" => Ok(WeightMode::FeatureCount),
            "own_count" => Ok(WeightMode::OwnCount),
            other => Err(format!(
                "invalid weight mode '{other}'; expected 'feature_count' or 'own_count'"
            )),
        }
    }
}

/// Weights used to blend the face and corner estimates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CombineSettings {
    pub face_weight: f64,
    pub feature_weight: f64,
    pub weight_mode: WeightMode,
}

impl Default for CombineSettings {
    fn default() -> Self {
        Self {
            face_weight: 10.0,
            feature_weight: 10.0,
            weight_mode: WeightMode::FeatureCount,
        }
    }
}

/// Resampling filter used by the auto-resizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl ResizeFilter {
    /// Map onto the `image` crate's filter.
    pub fn filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ResizeSettings {
    pub filter: ResizeFilter,
}

/// Encoder options for the written crop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// JPEG quality (1-100), only used when the output extension is jpg/jpeg.
    pub jpeg_quality: u8,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { jpeg_quality: 90 }
    }
}

/// Settings controlling optional runtime telemetry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Whether stage timing logs are enabled.
    pub enabled: bool,
    /// Logging level for telemetry output (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "debug".to_string(),
        }
    }
}

impl TelemetrySettings {
    /// Resolve the configured level string into a `LevelFilter`.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.trim().parse().unwrap_or(LevelFilter::Debug)
    }
}

/// All tunables for one crop run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppSettings {
    pub face: FaceSettings,
    pub features: FeatureSettings,
    pub combine: CombineSettings,
    pub resize: ResizeSettings,
    pub output: OutputSettings,
    pub telemetry: TelemetrySettings,
}

impl AppSettings {
    /// Load settings from a JSON file. Missing sections keep their defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let mut settings: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings JSON at {}", path.display()))?;
        settings.sanitize();
        Ok(settings)
    }

    /// Serialize settings to disk in pretty-printed JSON.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload =
            serde_json::to_string_pretty(self).context("failed to serialize settings JSON")?;
        fs::write(path, payload)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }

    /// Clamp values to ranges the detectors and encoders accept.
    pub fn sanitize(&mut self) {
        self.features.quality_level = self.features.quality_level.clamp(0.0, 1.0);
        self.features.min_distance = self.features.min_distance.max(0.0);
        self.combine.face_weight = self.combine.face_weight.max(0.0);
        self.combine.feature_weight = self.combine.feature_weight.max(0.0);
        if !(self.face.scale_factor > 1.0) {
            self.face.scale_factor = FaceSettings::default().scale_factor;
        }
        self.face.window_step = self.face.window_step.max(1);
        self.output.jpeg_quality = self.output.jpeg_quality.clamp(1, 100);
    }
}
