//! Exact crop geometry around a focal point.
//!
//! Each axis is handled independently: the window is centered on the focal
//! point, then slid back inside the image if it overflows an edge. The window
//! is only ever shrunk when the target is larger than the source on that axis.

use std::fmt;

use focal_utils::Point;

/// Pixel window selected for output, in source image coordinates.
///
/// `left`/`top` are inclusive, `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Non-fatal problems found while placing the crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropWarning {
    /// The requested width exceeds the source width; the crop spans the full width.
    TargetWider { target: u32, original: u32 },
    /// The requested height exceeds the source height; the crop spans the full height.
    TargetTaller { target: u32, original: u32 },
}

impl fmt::Display for CropWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropWarning::TargetWider { target, original } => write!(
                f,
                "target wider than image ({target}px > {original}px); output will be {original}px wide"
            ),
            CropWarning::TargetTaller { target, original } => write!(
                f,
                "target higher than image ({target}px > {original}px); output will be {original}px high"
            ),
        }
    }
}

/// Crop rectangle plus any warnings raised while computing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropPlan {
    pub rect: CropRect,
    pub warnings: Vec<CropWarning>,
}

impl CropPlan {
    /// True when the rectangle matches the requested size exactly.
    pub fn is_exact(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Place a `target` window on one axis of length `original` around `center`.
///
/// Returns `(start, end)` with `0 <= start <= end <= original`.
fn place_axis(center: f64, original: u32, target: u32) -> (u32, u32) {
    let original = i64::from(original);
    let target = i64::from(target);
    // Centers further out than one window past either edge place the same way.
    let center = if center.is_finite() {
        center.floor().clamp(-target as f64, (original + target) as f64) as i64
    } else {
        0
    };

    let mut start = (center - target / 2).max(0);
    let overflow = start + target - original;
    if overflow > 0 {
        start -= overflow;
    }
    let start = start.max(0);
    let end = (start + target).min(original);

    (start as u32, end as u32)
}

/// Compute the crop window of `target` size centered as closely as possible on `center`.
///
/// # Arguments
/// - `center`: focal point in source pixel coordinates.
/// - `original`: source `(width, height)`.
/// - `target`: requested `(width, height)`.
///
/// # Examples
///
/// ```rust
/// # use focal_core::geometry::{exact_crop, CropRect};
/// # use focal_utils::Point;
/// let plan = exact_crop(Point::new(225.0, 225.0), (1000, 800), (400, 300));
/// assert_eq!(
///     plan.rect,
///     CropRect { left: 25, top: 75, right: 425, bottom: 375 }
/// );
/// assert!(plan.warnings.is_empty());
/// ```
///
/// A focal point near the bottom-right corner slides the window inward:
///
/// ```rust
/// # use focal_core::geometry::exact_crop;
/// # use focal_utils::Point;
/// let plan = exact_crop(Point::new(990.0, 790.0), (1000, 800), (400, 300));
/// assert_eq!((plan.rect.right, plan.rect.bottom), (1000, 800));
/// assert_eq!((plan.rect.width(), plan.rect.height()), (400, 300));
/// ```
pub fn exact_crop(center: Point, original: (u32, u32), target: (u32, u32)) -> CropPlan {
    let (orig_w, orig_h) = original;
    let (target_w, target_h) = target;

    let mut warnings = Vec::new();
    if target_w > orig_w {
        warnings.push(CropWarning::TargetWider {
            target: target_w,
            original: orig_w,
        });
    }
    if target_h > orig_h {
        warnings.push(CropWarning::TargetTaller {
            target: target_h,
            original: orig_h,
        });
    }

    let (left, right) = place_axis(center.x, orig_w, target_w);
    let (top, bottom) = place_axis(center.y, orig_h, target_h);

    CropPlan {
        rect: CropRect {
            left,
            top,
            right,
            bottom,
        },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn centered_when_far_from_edges() {
        let plan = exact_crop(Point::new(500.0, 400.0), (1000, 800), (400, 300));
        assert_eq!(
            plan.rect,
            CropRect {
                left: 300,
                top: 250,
                right: 700,
                bottom: 550
            }
        );
        assert!(plan.is_exact());
    }

    #[test]
    fn shifts_right_when_center_near_left_edge() {
        let plan = exact_crop(Point::new(50.0, 400.0), (1000, 800), (400, 300));
        assert_eq!(plan.rect.left, 0);
        assert_eq!(plan.rect.right, 400);
    }

    #[test]
    fn shifts_left_when_center_near_right_edge() {
        let plan = exact_crop(Point::new(950.0, 400.0), (1000, 800), (400, 300));
        assert_eq!(plan.rect.left, 600);
        assert_eq!(plan.rect.right, 1000);
    }

    #[test]
    fn fractional_center_is_floored() {
        let plan = exact_crop(Point::new(225.9, 225.4), (1000, 800), (400, 300));
        assert_eq!(plan.rect.left, 25);
        assert_eq!(plan.rect.top, 75);
    }

    #[test]
    fn odd_target_keeps_exact_size() {
        let plan = exact_crop(Point::new(100.0, 100.0), (201, 201), (201, 99));
        assert_eq!(plan.rect.width(), 201);
        assert_eq!(plan.rect.height(), 99);
        assert_eq!(plan.rect.top, 51);
    }

    #[test]
    fn oversize_target_spans_full_extent_and_warns() {
        let plan = exact_crop(Point::new(50.0, 40.0), (100, 80), (150, 120));
        assert_eq!(
            plan.rect,
            CropRect {
                left: 0,
                top: 0,
                right: 100,
                bottom: 80
            }
        );
        assert_eq!(
            plan.warnings,
            vec![
                CropWarning::TargetWider {
                    target: 150,
                    original: 100
                },
                CropWarning::TargetTaller {
                    target: 120,
                    original: 80
                },
            ]
        );
        assert!(!plan.is_exact());
    }

    #[test]
    fn oversize_on_one_axis_only_warns_for_that_axis() {
        let plan = exact_crop(Point::new(50.0, 40.0), (100, 80), (60, 120));
        assert_eq!(plan.rect.width(), 60);
        assert_eq!((plan.rect.top, plan.rect.bottom), (0, 80));
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.warnings[0].to_string().contains("higher"));
    }

    #[test]
    fn non_finite_center_stays_in_bounds() {
        let plan = exact_crop(Point::new(f64::NAN, f64::INFINITY), (100, 80), (40, 30));
        assert_eq!((plan.rect.left, plan.rect.right), (0, 40));
        assert_eq!((plan.rect.top, plan.rect.bottom), (0, 30));
    }

    #[test]
    fn huge_center_stays_in_bounds() {
        let far = exact_crop(Point::new(1e300, 1e300), (100, 80), (40, 30)).rect;
        assert_eq!((far.left, far.right), (60, 100));
        assert_eq!((far.top, far.bottom), (50, 80));

        let near = exact_crop(Point::new(-1e300, -1e300), (100, 80), (40, 30)).rect;
        assert_eq!((near.left, near.right), (0, 40));
        assert_eq!((near.top, near.bottom), (0, 30));
    }

    #[test]
    fn center_just_past_the_edge_matches_unclamped_placement() {
        let plan = exact_crop(Point::new(1000.0 + 400.0, 225.0), (1000, 800), (400, 300));
        assert_eq!((plan.rect.left, plan.rect.right), (600, 1000));
        let plan = exact_crop(Point::new(-400.0, 225.0), (1000, 800), (400, 300));
        assert_eq!((plan.rect.left, plan.rect.right), (0, 400));
    }

    fn dims_and_target() -> impl Strategy<Value = (u32, u32, u32, u32)> {
        (1u32..2000, 1u32..2000).prop_flat_map(|(w, h)| (Just(w), Just(h), 1..=w, 1..=h))
    }

    proptest! {
        #[test]
        fn crop_matches_target_when_it_fits(
            (w, h, tw, th) in dims_and_target(),
            cx in -500.0f64..2500.0,
            cy in -500.0f64..2500.0,
        ) {
            let plan = exact_crop(Point::new(cx, cy), (w, h), (tw, th));
            prop_assert_eq!(plan.rect.width(), tw);
            prop_assert_eq!(plan.rect.height(), th);
            prop_assert!(plan.warnings.is_empty());
        }

        #[test]
        fn crop_is_always_contained(
            w in 1u32..1500,
            h in 1u32..1500,
            tw in 1u32..3000,
            th in 1u32..3000,
            cx in prop_oneof![-1000.0f64..3000.0, -1e300f64..1e300],
            cy in prop_oneof![-1000.0f64..3000.0, -1e300f64..1e300],
        ) {
            let rect = exact_crop(Point::new(cx, cy), (w, h), (tw, th)).rect;
            prop_assert!(rect.left < rect.right && rect.right <= w);
            prop_assert!(rect.top < rect.bottom && rect.bottom <= h);
            prop_assert_eq!(rect.width(), tw.min(w));
            prop_assert_eq!(rect.height(), th.min(h));
        }

        #[test]
        fn interior_focal_point_is_centered(
            (w, h, tw, th) in dims_and_target(),
            fx in 0.0f64..=1.0,
            fy in 0.0f64..=1.0,
        ) {
            let min_x = tw / 2;
            let max_x = w - (tw - tw / 2);
            let min_y = th / 2;
            let max_y = h - (th - th / 2);
            let cx = min_x + ((max_x - min_x) as f64 * fx) as u32;
            let cy = min_y + ((max_y - min_y) as f64 * fy) as u32;

            let rect = exact_crop(Point::new(cx as f64, cy as f64), (w, h), (tw, th)).rect;
            prop_assert_eq!(rect.left, cx - tw / 2);
            prop_assert_eq!(rect.top, cy - th / 2);
        }

        #[test]
        fn overflow_shifts_window_to_touch_the_edge(
            (w, h, tw, th) in dims_and_target(),
            past in 1u32..500,
        ) {
            // Centered placement would overflow the right/bottom edges.
            let cx = w - (tw - tw / 2) + past;
            let cy = h - (th - th / 2) + past;
            let rect = exact_crop(Point::new(cx as f64, cy as f64), (w, h), (tw, th)).rect;
            prop_assert_eq!(rect.right, w);
            prop_assert_eq!(rect.bottom, h);
            prop_assert_eq!(rect.width(), tw);

            // And past the left/top edges.
            let behind = Point::new(-(past as f64), -(past as f64));
            let left = exact_crop(behind, (w, h), (tw, th)).rect;
            prop_assert_eq!(left.left, 0);
            prop_assert_eq!(left.top, 0);
            prop_assert_eq!(left.height(), th);
        }
    }
}
