//! Corner detection for the feature-based estimator.
//!
//! [`ShiTomasiDetector`] implements "good features to track": the minimum
//! eigenvalue of the gradient structure tensor is the corner response, weak
//! and non-maximal responses are discarded, and the strongest survivors are
//! kept subject to a minimum spacing.

use focal_utils::{Point, config::FeatureSettings};
use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// Pluggable corner detection backend.
pub trait FeatureDetector: Send + Sync {
    /// Detect corner points in a grayscale image, strongest first.
    fn detect(&self, gray: &GrayImage) -> Vec<Point>;
}

/// Shi-Tomasi corner detector.
#[derive(Debug, Clone, Default)]
pub struct ShiTomasiDetector {
    settings: FeatureSettings,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    x: u32,
    y: u32,
    response: f32,
}

impl ShiTomasiDetector {
    pub fn new(settings: FeatureSettings) -> Self {
        Self { settings }
    }

    fn candidates(&self, gray: &GrayImage) -> Vec<Candidate> {
        let (width, height) = gray.dimensions();
        if width < 3 || height < 3 {
            return Vec::new();
        }

        let response = min_eigen_response(gray);
        let max_response = response.iter().copied().fold(0.0f32, f32::max);
        if max_response <= 0.0 {
            return Vec::new();
        }
        let threshold = max_response * self.settings.quality_level;

        let w = width as usize;
        let mut candidates = Vec::new();
        for y in 1..height as usize - 1 {
            for x in 1..w - 1 {
                let value = response[y * w + x];
                if value <= threshold {
                    continue;
                }
                let is_peak = (y - 1..=y + 1)
                    .all(|ny| (x - 1..=x + 1).all(|nx| response[ny * w + nx] <= value));
                if is_peak {
                    candidates.push(Candidate {
                        x: x as u32,
                        y: y as u32,
                        response: value,
                    });
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.response
                .total_cmp(&a.response)
                .then(a.y.cmp(&b.y))
                .then(a.x.cmp(&b.x))
        });
        candidates
    }
}

impl FeatureDetector for ShiTomasiDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<Point> {
        let limit = match self.settings.max_corners {
            0 => usize::MAX,
            n => n,
        };
        let min_dist_sq = f64::from(self.settings.min_distance).powi(2);

        let mut accepted: Vec<Point> = Vec::new();
        for candidate in self.candidates(gray) {
            if accepted.len() >= limit {
                break;
            }
            let point = Point::new(f64::from(candidate.x), f64::from(candidate.y));
            if min_dist_sq > 0.0
                && accepted
                    .iter()
                    .any(|kept| kept.distance_squared(point) < min_dist_sq)
            {
                continue;
            }
            accepted.push(point);
        }
        accepted
    }
}

/// Per-pixel minimum eigenvalue of the 3x3-summed structure tensor.
fn min_eigen_response(gray: &GrayImage) -> Vec<f32> {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);

    let len = w * h;
    let mut xx = Vec::with_capacity(len);
    let mut xy = Vec::with_capacity(len);
    let mut yy = Vec::with_capacity(len);
    for (dx, dy) in gx.pixels().zip(gy.pixels()) {
        let dx = f32::from(dx[0]);
        let dy = f32::from(dy[0]);
        xx.push(dx * dx);
        xy.push(dx * dy);
        yy.push(dy * dy);
    }

    let xx = box_sum_3x3(&xx, w, h);
    let xy = box_sum_3x3(&xy, w, h);
    let yy = box_sum_3x3(&yy, w, h);

    xx.iter()
        .zip(&xy)
        .zip(&yy)
        .map(|((&a, &b), &c)| {
            let half_trace = (a + c) * 0.5;
            let half_diff = (a - c) * 0.5;
            (half_trace - half_diff.hypot(b)).max(0.0)
        })
        .collect()
}

/// Separable 3x3 box sum with replicated borders.
fn box_sum_3x3(values: &[f32], w: usize, h: usize) -> Vec<f32> {
    let mut rows = vec![0.0f32; values.len()];
    for y in 0..h {
        let row = &values[y * w..(y + 1) * w];
        for x in 0..w {
            let left = row[x.saturating_sub(1)];
            let right = row[(x + 1).min(w - 1)];
            rows[y * w + x] = left + row[x] + right;
        }
    }

    let mut out = vec![0.0f32; values.len()];
    for y in 0..h {
        let up = y.saturating_sub(1) * w;
        let down = (y + 1).min(h - 1) * w;
        for x in 0..w {
            out[y * w + x] = rows[up + x] + rows[y * w + x] + rows[down + x];
        }
    }
    out
}
