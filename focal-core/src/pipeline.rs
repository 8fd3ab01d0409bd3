//! End-to-end focal crop: resize, estimate the focal point, place the window, crop.

use std::path::Path;

use anyhow::{Context, Result};
use focal_utils::{AppSettings, load_image, save_image, timing_guard, to_grayscale};
use image::{DynamicImage, GenericImageView};
use log::info;

use crate::{
    combine::{FocalPoint, auto_center},
    detector::FaceDetector,
    error::CropError,
    features::{FeatureDetector, ShiTomasiDetector},
    geometry::{CropRect, CropWarning, exact_crop},
    observer::PipelineObserver,
    resize::{ResizePlan, auto_resize},
};

/// Per-run switches that are not part of the persisted settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropOptions {
    /// Rescale the image toward the target size before cropping.
    pub resize: bool,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self { resize: true }
    }
}

/// Everything produced by one crop run.
#[derive(Debug, Clone)]
pub struct CropOutput {
    /// The cropped image.
    pub image: DynamicImage,
    /// Crop window in the coordinates of the (possibly resized) working image.
    pub rect: CropRect,
    pub center: FocalPoint,
    /// `Some` when the image was rescaled before cropping.
    pub resize: Option<ResizePlan>,
    pub warnings: Vec<CropWarning>,
}

/// Couples detectors with settings and runs the crop pipeline.
pub struct FocalCropper {
    settings: AppSettings,
    face_detector: Option<Box<dyn FaceDetector>>,
    feature_detector: Box<dyn FeatureDetector>,
}

impl FocalCropper {
    /// Build a cropper from explicit detectors.
    ///
    /// Pass `None` for `face_detector` to rely on corner features alone.
    pub fn new(
        settings: AppSettings,
        face_detector: Option<Box<dyn FaceDetector>>,
        feature_detector: Box<dyn FeatureDetector>,
    ) -> Self {
        Self {
            settings,
            face_detector,
            feature_detector,
        }
    }

    /// Build a cropper using the Shi-Tomasi corner detector from `settings`.
    pub fn with_face_detector(
        settings: AppSettings,
        face_detector: Option<Box<dyn FaceDetector>>,
    ) -> Self {
        let features = ShiTomasiDetector::new(settings.features);
        Self::new(settings, face_detector, Box::new(features))
    }

    /// Crop `image` to `target` (`(width, height)`) around its focal point.
    pub fn crop_image(
        &self,
        image: &DynamicImage,
        target: (u32, u32),
        options: CropOptions,
        observer: &mut dyn PipelineObserver,
    ) -> Result<CropOutput, CropError> {
        let _guard = timing_guard("focal_core::crop_image", log::Level::Debug);
        let (target_w, target_h) = target;
        if target_w == 0 || target_h == 0 {
            return Err(CropError::InvalidTarget {
                width: target_w,
                height: target_h,
            });
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(CropError::EmptyImage);
        }

        let (working, resize) = if options.resize {
            let filter = self.settings.resize.filter.filter_type();
            let (resized, plan) = auto_resize(image, target, filter, observer)?;
            (Some(resized), Some(plan))
        } else {
            (None, None)
        };
        let working = working.as_ref().unwrap_or(image);

        let gray = to_grayscale(working);
        let center = auto_center(
            &gray,
            self.face_detector.as_deref(),
            &*self.feature_detector,
            &self.settings.combine,
            observer,
        );

        let plan = exact_crop(center.point(), working.dimensions(), target);
        for warning in &plan.warnings {
            observer.on_warning(warning);
        }
        observer.on_crop(&plan.rect);

        let rect = plan.rect;
        let cropped = working.crop_imm(rect.left, rect.top, rect.width(), rect.height());

        Ok(CropOutput {
            image: cropped,
            rect,
            center,
            resize,
            warnings: plan.warnings,
        })
    }

    /// Load `input`, crop it, and write the result to `output`.
    ///
    /// Nothing is written when loading or cropping fails.
    pub fn crop_file(
        &self,
        input: &Path,
        output: &Path,
        target: (u32, u32),
        options: CropOptions,
        observer: &mut dyn PipelineObserver,
    ) -> Result<CropOutput> {
        let image = load_image(input).context("could not read source image")?;
        let result = self
            .crop_image(&image, target, options, observer)
            .with_context(|| format!("failed to crop {}", input.display()))?;

        save_image(&result.image, output, &self.settings.output)?;
        info!(
            "Wrote {}x{} crop to {}",
            result.image.width(),
            result.image.height(),
            output.display()
        );
        Ok(result)
    }
}
