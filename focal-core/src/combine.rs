//! Fuse the face and corner estimates into a single focal point.

use std::fmt;

use focal_utils::{
    Point,
    config::{CombineSettings, WeightMode},
};
use image::GrayImage;

use crate::{
    detector::FaceDetector,
    estimate::{PointEstimate, center_from_faces, center_from_features},
    features::FeatureDetector,
    observer::PipelineObserver,
};

/// Which evidence produced the focal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterSource {
    /// Faces only; the corner detector found nothing.
    Faces,
    /// Corners only; no face was found.
    Features,
    /// Weighted blend of faces and corners.
    Combined,
    /// Nothing usable was detected.
    ImageCenter,
}

impl fmt::Display for CenterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CenterSource::Faces => "faces",
            CenterSource::Features => "corner features",
            CenterSource::Combined => "faces + corner features",
            CenterSource::ImageCenter => "image center",
        })
    }
}

/// The pixel the crop should be centered on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
    pub source: CenterSource,
}

impl FocalPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn at(point: Point, source: CenterSource) -> Self {
        Self {
            x: point.x,
            y: point.y,
            source,
        }
    }

    /// Geometric center of a `width` x `height` image.
    pub fn image_center(width: u32, height: u32) -> Self {
        Self::at(
            Point::new(f64::from(width) / 2.0, f64::from(height) / 2.0),
            CenterSource::ImageCenter,
        )
    }
}

/// Blend weights `(face, feature)` for two present estimates.
pub fn combine_weights(
    face: &PointEstimate,
    features: &PointEstimate,
    settings: &CombineSettings,
) -> (f64, f64) {
    let feature_count = features.count as f64;
    let face_count = match settings.weight_mode {
        WeightMode::FeatureCount => feature_count,
        WeightMode::OwnCount => face.count as f64,
    };
    (
        face_count * settings.face_weight,
        feature_count * settings.feature_weight,
    )
}

/// Combine optional estimates; `image_size` supplies the fallback center.
///
/// - no face: the corner estimate is returned as is
/// - no corners: the face estimate is returned as is
/// - both: weight-normalized average, which always lies between the two
/// - nothing, or both weights zero: the image center
pub fn combine_estimates(
    face: Option<&PointEstimate>,
    features: Option<&PointEstimate>,
    settings: &CombineSettings,
    image_size: (u32, u32),
) -> FocalPoint {
    let fallback = FocalPoint::image_center(image_size.0, image_size.1);
    match (face, features) {
        (None, Some(features)) => FocalPoint::at(features.point(), CenterSource::Features),
        (Some(face), None) => FocalPoint::at(face.point(), CenterSource::Faces),
        (None, None) => fallback,
        (Some(face), Some(features)) => {
            let (face_w, feat_w) = combine_weights(face, features, settings);
            let total = face_w + feat_w;
            if !(total > 0.0) {
                return fallback;
            }
            let blended = face.point().lerp(features.point(), feat_w / total);
            FocalPoint::at(blended, CenterSource::Combined)
        }
    }
}

/// Estimate the focal point of `gray`.
///
/// Faces are looked for first (when a face detector is available). Corner
/// features are always computed afterwards and blended in according to
/// `settings`.
pub fn auto_center(
    gray: &GrayImage,
    face_detector: Option<&dyn FaceDetector>,
    feature_detector: &dyn FeatureDetector,
    settings: &CombineSettings,
    observer: &mut dyn PipelineObserver,
) -> FocalPoint {
    let face = match face_detector {
        Some(detector) => center_from_faces(detector, gray, observer),
        None => {
            observer.on_face_estimate(None);
            None
        }
    };
    let features = center_from_features(feature_detector, gray, observer);

    let center = combine_estimates(face.as_ref(), features.as_ref(), settings, gray.dimensions());
    observer.on_center(&center);
    center
}
