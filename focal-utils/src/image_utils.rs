use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, imageops::FilterType};

/// Load an image from disk into memory.
///
/// # Arguments
///
/// * `path` - The path to the image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path_ref = path.as_ref();
    image::open(path_ref).with_context(|| format!("failed to open image {}", path_ref.display()))
}

/// Resize an image to exactly `width` x `height`, ignoring aspect ratio.
///
/// # Arguments
///
/// * `image` - The image to resize.
/// * `width` - The target width.
/// * `height` - The target height.
/// * `filter` - The sampling filter to use for resizing.
pub fn resize_image(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }
    image.resize_exact(width, height, filter)
}

/// Luma conversion used by both detectors.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}
