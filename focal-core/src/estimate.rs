//! Focal point estimators.
//!
//! Both estimators return `Option<PointEstimate>`: `None` means the detector
//! found nothing, so a present estimate always has `count >= 1`.

use focal_utils::{Point, timing_guard};
use image::GrayImage;

use crate::{
    detector::{BoundingBox, FaceDetector},
    features::FeatureDetector,
    observer::PipelineObserver,
};

/// One estimator's guess at the focal point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointEstimate {
    pub x: f64,
    pub y: f64,
    /// Number of detections behind the estimate.
    pub count: usize,
}

impl PointEstimate {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Area-weighted centroid of face boxes.
///
/// Each box contributes its center weighted by `width * height`. If every box
/// is degenerate (zero area) the plain mean of the centers is used instead.
pub fn weighted_face_centroid(faces: &[BoundingBox]) -> Option<PointEstimate> {
    if faces.is_empty() {
        return None;
    }

    let total_area: f64 = faces.iter().map(BoundingBox::area).sum();
    let center = if total_area > 0.0 {
        faces
            .iter()
            .map(|face| face.center() * face.area())
            .sum::<Point>()
            / total_area
    } else {
        faces.iter().map(BoundingBox::center).sum::<Point>() / faces.len() as f64
    };

    Some(PointEstimate {
        x: center.x,
        y: center.y,
        count: faces.len(),
    })
}

/// Unweighted mean of corner points.
pub fn mean_point(points: &[Point]) -> Option<PointEstimate> {
    if points.is_empty() {
        return None;
    }
    let center = points.iter().copied().sum::<Point>() / points.len() as f64;
    Some(PointEstimate {
        x: center.x,
        y: center.y,
        count: points.len(),
    })
}

/// Run the face detector and fold its boxes into an area-weighted centroid.
pub fn center_from_faces(
    detector: &dyn FaceDetector,
    gray: &GrayImage,
    observer: &mut dyn PipelineObserver,
) -> Option<PointEstimate> {
    let faces = {
        let _guard = timing_guard("focal_core::face_detection", log::Level::Debug);
        detector.detect(gray)
    };
    for face in &faces {
        observer.on_face_detected(face);
    }

    let estimate = weighted_face_centroid(&faces);
    observer.on_face_estimate(estimate.as_ref());
    estimate
}

/// Run the corner detector and average the points it returns.
pub fn center_from_features(
    detector: &dyn FeatureDetector,
    gray: &GrayImage,
    observer: &mut dyn PipelineObserver,
) -> Option<PointEstimate> {
    let points = {
        let _guard = timing_guard("focal_core::feature_detection", log::Level::Debug);
        detector.detect(gray)
    };

    let estimate = mean_point(&points);
    observer.on_feature_estimate(estimate.as_ref());
    estimate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;

    struct FixedFaces(Vec<BoundingBox>);

    impl FaceDetector for FixedFaces {
        fn detect(&self, _gray: &GrayImage) -> Vec<BoundingBox> {
            self.0.clone()
        }
    }

    struct FixedPoints(Vec<Point>);

    impl FeatureDetector for FixedPoints {
        fn detect(&self, _gray: &GrayImage) -> Vec<Point> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct CountingObserver {
        faces: usize,
        face_estimates: Vec<Option<PointEstimate>>,
    }

    impl PipelineObserver for CountingObserver {
        fn on_face_detected(&mut self, _face: &BoundingBox) {
            self.faces += 1;
        }

        fn on_face_estimate(&mut self, estimate: Option<&PointEstimate>) {
            self.face_estimates.push(estimate.copied());
        }
    }

    #[test]
    fn single_face_centroid_is_box_center() {
        let estimate = weighted_face_centroid(&[BoundingBox::new(100.0, 100.0, 200.0, 200.0)])
            .expect("estimate");
        assert_eq!(
            estimate,
            PointEstimate {
                x: 200.0,
                y: 200.0,
                count: 1
            }
        );
    }

    #[test]
    fn larger_faces_pull_the_centroid() {
        // Centers at (10, 10) with area 400 and (110, 10) with area 100.
        let faces = [
            BoundingBox::new(0.0, 0.0, 20.0, 20.0),
            BoundingBox::new(105.0, 5.0, 10.0, 10.0),
        ];
        let estimate = weighted_face_centroid(&faces).expect("estimate");
        assert_eq!(estimate.count, 2);
        assert!((estimate.x - 30.0).abs() < 1e-9);
        assert!((estimate.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_area_faces_fall_back_to_plain_mean() {
        let faces = [
            BoundingBox::new(10.0, 10.0, 0.0, 0.0),
            BoundingBox::new(30.0, 50.0, 0.0, 0.0),
        ];
        let estimate = weighted_face_centroid(&faces).expect("estimate");
        assert_eq!((estimate.x, estimate.y), (20.0, 30.0));
    }

    #[test]
    fn no_faces_is_no_estimate() {
        assert!(weighted_face_centroid(&[]).is_none());
    }

    #[test]
    fn mean_point_averages_and_counts() {
        let estimate = mean_point(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .expect("estimate");
        assert_eq!(
            estimate,
            PointEstimate {
                x: 5.0,
                y: 5.0,
                count: 4
            }
        );
        assert!(mean_point(&[]).is_none());
    }

    #[test]
    fn center_from_faces_reports_every_box() {
        let gray = GrayImage::new(10, 10);
        let detector = FixedFaces(vec![
            BoundingBox::new(0.0, 0.0, 4.0, 4.0),
            BoundingBox::new(4.0, 4.0, 4.0, 4.0),
        ]);
        let mut observer = CountingObserver::default();

        let estimate = center_from_faces(&detector, &gray, &mut observer).expect("estimate");
        assert_eq!((estimate.x, estimate.y), (4.0, 4.0));
        assert_eq!(observer.faces, 2);
        assert_eq!(observer.face_estimates, vec![Some(estimate)]);
    }

    #[test]
    fn center_from_features_without_points_is_none() {
        let gray = GrayImage::new(10, 10);
        let detector = FixedPoints(Vec::new());
        assert!(center_from_features(&detector, &gray, &mut NullObserver).is_none());
    }
}
