//! Face detection seam.
//!
//! The estimators only see the [`FaceDetector`] trait; [`RustfaceDetector`] is
//! the built-in backend driving the SeetaFace frontal cascade through
//! `rustface`.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use focal_utils::{Point, config::FaceSettings};
use image::GrayImage;
use log::debug;

use crate::error::CropError;

/// SeetaFace rejects minimum face sizes below this.
const RUSTFACE_MIN_FACE: u32 = 20;

/// Axis-aligned bounding box in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// The x-coordinate of the top-left corner.
    pub x: f64,
    /// The y-coordinate of the top-left corner.
    pub y: f64,
    /// The width of the box.
    pub width: f64,
    /// The height of the box.
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Pixel area; negative extents count as zero.
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.width.mul_add(0.5, self.x),
            self.height.mul_add(0.5, self.y),
        )
    }
}

/// Pluggable face detection backend.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a grayscale image.
    fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox>;
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
pub struct RustfaceDetector {
    model: rustface::Model,
    settings: FaceSettings,
}

impl RustfaceDetector {
    /// Load the SeetaFace model named by `settings.model_path`.
    pub fn from_settings(settings: &FaceSettings) -> Result<Self, CropError> {
        Self::load(&settings.model_path, settings.clone())
    }

    /// Load a SeetaFace model file with the given detection parameters.
    pub fn load<P: AsRef<Path>>(model_path: P, settings: FaceSettings) -> Result<Self, CropError> {
        let path = model_path.as_ref();
        let model_error = |reason: String| CropError::ModelLoad {
            path: PathBuf::from(path),
            reason,
        };
        let file = File::open(path).map_err(|err| model_error(err.to_string()))?;
        let model =
            rustface::read_model(BufReader::new(file)).map_err(|err| model_error(err.to_string()))?;
        debug!("Loaded SeetaFace model from {}", path.display());
        Ok(Self { model, settings })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox> {
        let (width, height) = gray.dimensions();
        let min_face = self.settings.min_face_size.max(RUSTFACE_MIN_FACE);
        if width < min_face || height < min_face {
            return Vec::new();
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(min_face);
        detector.set_score_thresh(self.settings.score_threshold);
        detector.set_pyramid_scale_factor(1.0 / self.settings.scale_factor);
        detector.set_slide_window_step(self.settings.window_step, self.settings.window_step);

        detector
            .detect(&rustface::ImageData::new(gray.as_raw(), width, height))
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                BoundingBox::new(
                    bbox.x() as f64,
                    bbox.y() as f64,
                    bbox.width() as f64,
                    bbox.height() as f64,
                )
            })
            .collect()
    }
}
