//! Per-stage callbacks for the crop pipeline.
//!
//! The core never writes to stdout/stderr. Each stage reports what it found
//! through a [`PipelineObserver`]; the CLI plugs in [`LogObserver`], tests plug
//! in a recorder.

use log::{debug, info, warn};

use crate::{
    combine::FocalPoint,
    detector::BoundingBox,
    estimate::PointEstimate,
    geometry::{CropRect, CropWarning},
    resize::ResizePlan,
};

/// Receives diagnostics from each pipeline stage. All methods default to no-ops.
pub trait PipelineObserver {
    fn on_resize(&mut self, _plan: &ResizePlan) {}

    /// Called once per face box returned by the detector.
    fn on_face_detected(&mut self, _face: &BoundingBox) {}

    /// `None` when no face was found.
    fn on_face_estimate(&mut self, _estimate: Option<&PointEstimate>) {}

    /// `None` when no corner was found.
    fn on_feature_estimate(&mut self, _estimate: Option<&PointEstimate>) {}

    fn on_center(&mut self, _center: &FocalPoint) {}

    fn on_crop(&mut self, _rect: &CropRect) {}

    fn on_warning(&mut self, _warning: &CropWarning) {}
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}

/// Observer that forwards every stage to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_resize(&mut self, plan: &ResizePlan) {
        info!(
            "Image resized by {} x {} in {} pass(es) to {}x{}",
            plan.delta_width, plan.delta_height, plan.passes, plan.width, plan.height
        );
    }

    fn on_face_detected(&mut self, face: &BoundingBox) {
        debug!(
            "Face detected at ({}, {}) size {}x{}",
            face.x, face.y, face.width, face.height
        );
    }

    fn on_face_estimate(&mut self, estimate: Option<&PointEstimate>) {
        match estimate {
            Some(face) => info!(
                "Face center ({:.1}, {:.1}) from {} face(s)",
                face.x, face.y, face.count
            ),
            None => info!("No faces detected, using corner features"),
        }
    }

    fn on_feature_estimate(&mut self, estimate: Option<&PointEstimate>) {
        match estimate {
            Some(features) => info!(
                "Feature center ({:.1}, {:.1}) from {} corner(s)",
                features.x, features.y, features.count
            ),
            None => info!("No corner features detected"),
        }
    }

    fn on_center(&mut self, center: &FocalPoint) {
        info!(
            "Found center at ({:.1}, {:.1}) via {}",
            center.x, center.y, center.source
        );
    }

    fn on_crop(&mut self, rect: &CropRect) {
        info!(
            "Crop rectangle is left={} top={} right={} bottom={}",
            rect.left, rect.top, rect.right, rect.bottom
        );
    }

    fn on_warning(&mut self, warning: &CropWarning) {
        warn!("{warning}");
    }
}
