//! Pre-crop rescaling so the crop does not throw away more of the image than needed.

use focal_utils::{resize_image, timing_guard};
use image::{DynamicImage, imageops::FilterType};

use crate::{error::CropError, observer::PipelineObserver};

/// Slack for float round-off when comparing scaled sizes against the target.
const SCALE_EPSILON: f64 = 1e-6;

/// Outcome of [`plan_resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub width: u32,
    pub height: u32,
    /// 1 when matching the target width was enough, 2 when a second scale was needed.
    pub passes: u8,
    /// New width minus original width.
    pub delta_width: i64,
    /// New height minus original height.
    pub delta_height: i64,
}

fn to_pixels(value: f64) -> u32 {
    let rounded = value.round();
    let snapped = if (value - rounded).abs() < SCALE_EPSILON {
        rounded
    } else {
        value.floor()
    };
    snapped.clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Work out the size to rescale `original` to before cropping to `target`.
///
/// The first pass scales so the width equals the target width. If the height
/// then falls short, a second pass scales the already-scaled size up by
/// whichever ratio covers both axes. The result always satisfies
/// `width >= target.0 && height >= target.1`.
pub fn plan_resize(original: (u32, u32), target: (u32, u32)) -> Result<ResizePlan, CropError> {
    let (orig_w, orig_h) = original;
    let (target_w, target_h) = target;
    if target_w == 0 || target_h == 0 {
        return Err(CropError::InvalidTarget {
            width: target_w,
            height: target_h,
        });
    }
    if orig_w == 0 || orig_h == 0 {
        return Err(CropError::EmptyImage);
    }

    let (tw, th) = (f64::from(target_w), f64::from(target_h));
    let ratio = tw / f64::from(orig_w);
    let mut new_w = f64::from(orig_w) * ratio;
    let mut new_h = f64::from(orig_h) * ratio;
    let mut passes = 1;

    if new_w < tw - SCALE_EPSILON || new_h < th - SCALE_EPSILON {
        let ratio = (tw / new_w).max(th / new_h);
        new_w *= ratio;
        new_h *= ratio;
        passes = 2;
    }

    let width = to_pixels(new_w).max(target_w);
    let height = to_pixels(new_h).max(target_h);
    Ok(ResizePlan {
        width,
        height,
        passes,
        delta_width: i64::from(width) - i64::from(orig_w),
        delta_height: i64::from(height) - i64::from(orig_h),
    })
}

/// Rescale `image` according to [`plan_resize`] and report the plan to `observer`.
pub fn auto_resize(
    image: &DynamicImage,
    target: (u32, u32),
    filter: FilterType,
    observer: &mut dyn PipelineObserver,
) -> Result<(DynamicImage, ResizePlan), CropError> {
    let _guard = timing_guard("focal_core::auto_resize", log::Level::Debug);
    let plan = plan_resize((image.width(), image.height()), target)?;
    let resized = resize_image(image, plan.width, plan.height, filter);
    observer.on_resize(&plan);
    Ok((resized, plan))
}
