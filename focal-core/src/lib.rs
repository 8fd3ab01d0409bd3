//! Focal point estimation and exact cropping.
//!
//! Faces (via `rustface`) and Shi-Tomasi corners each produce a focal point
//! estimate; the two are blended into one center, and a crop of the exact
//! requested size is placed around it.

/// Focal point fusion.
pub mod combine;
/// Face detection backends.
pub mod detector;
pub mod error;
/// Face and corner based focal point estimators.
pub mod estimate;
/// Shi-Tomasi corner detection.
pub mod features;
/// Crop window placement.
pub mod geometry;
/// Stage callbacks.
pub mod observer;
/// End-to-end crop runner.
pub mod pipeline;
/// Pre-crop rescaling.
pub mod resize;

pub use combine::{CenterSource, FocalPoint, auto_center, combine_estimates, combine_weights};
pub use detector::{BoundingBox, FaceDetector, RustfaceDetector};
pub use error::CropError;
pub use estimate::{PointEstimate, center_from_faces, center_from_features};
pub use features::{FeatureDetector, ShiTomasiDetector};
pub use geometry::{CropPlan, CropRect, CropWarning, exact_crop};
pub use observer::{LogObserver, NullObserver, PipelineObserver};
pub use pipeline::{CropOptions, CropOutput, FocalCropper};
pub use resize::{ResizePlan, auto_resize, plan_resize};
