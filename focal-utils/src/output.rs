//! Writing the final crop to disk with the format implied by the destination path.

use crate::config::OutputSettings;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, codecs::jpeg::JpegEncoder};
use log::debug;
use std::{fs, path::Path};

/// Output formats recognised from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormatHint {
    Png,
    Jpeg,
    Webp,
    Bmp,
    Tiff,
}

impl ImageFormatHint {
    /// Determine format from a filesystem extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        ext.parse().ok()
    }

    /// Determine format from the extension of `path`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

impl std::str::FromStr for ImageFormatHint {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            "bmp" => Ok(Self::Bmp),
            "tif" | "tiff" => Ok(Self::Tiff),
            other => Err(format!("unknown image format '{other}'")),
        }
    }
}

/// Save `image` to `destination`, choosing the encoder from its extension.
///
/// Parent directories are created as needed. JPEG output drops any alpha
/// channel and uses `settings.jpeg_quality`.
pub fn save_image(
    image: &DynamicImage,
    destination: &Path,
    settings: &OutputSettings,
) -> Result<()> {
    let format = ImageFormatHint::from_path(destination).with_context(|| {
        format!(
            "cannot infer an output format from {} (supported extensions: png, jpg, jpeg, webp, bmp, tif, tiff)",
            destination.display()
        )
    })?;

    if let Some(parent) = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty() && !p.exists())
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    debug!(
        "Saving crop to {} using {:?} format",
        destination.display(),
        format
    );

    match format {
        ImageFormatHint::Jpeg => {
            // Encode fully before touching the destination.
            let mut bytes = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut bytes, settings.jpeg_quality);
            DynamicImage::ImageRgb8(image.to_rgb8())
                .write_with_encoder(encoder)
                .with_context(|| format!("failed to encode JPEG {}", destination.display()))?;
            fs::write(destination, &bytes)
                .with_context(|| format!("failed to write {}", destination.display()))?;
        }
        ImageFormatHint::Webp => {
            // The pure-Rust WebP encoder is lossless and only takes 8-bit RGB(A).
            DynamicImage::ImageRgba8(image.to_rgba8())
                .save_with_format(destination, format.image_format())
                .with_context(|| format!("failed to write {}", destination.display()))?;
        }
        _ => {
            image
                .save_with_format(destination, format.image_format())
                .with_context(|| format!("failed to write {}", destination.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(12, 9, Rgba([200, 40, 90, 255])))
    }

    #[test]
    fn extension_parsing_is_case_insensitive() {
        assert_eq!(
            ImageFormatHint::from_path(Path::new("out/CROP.JPG")),
            Some(ImageFormatHint::Jpeg)
        );
        assert_eq!(ImageFormatHint::from_extension("tif"), Some(ImageFormatHint::Tiff));
        assert_eq!(ImageFormatHint::from_path(Path::new("noext")), None);
    }

    #[test]
    fn saves_png_and_jpeg_with_nested_directories() {
        let dir = tempdir().expect("tempdir");
        let settings = OutputSettings::default();

        let png = dir.path().join("nested/deeper/out.png");
        save_image(&sample(), &png, &settings).expect("save png");
        assert_eq!(image::open(&png).expect("reopen").dimensions(), (12, 9));

        let jpeg = dir.path().join("out.jpeg");
        save_image(&sample(), &jpeg, &settings).expect("save jpeg");
        let bytes = fs::read(&jpeg).expect("read");
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let target = dir.path().join("out.xyz");
        let err = save_image(&sample(), &target, &OutputSettings::default()).unwrap_err();
        assert!(err.to_string().contains("cannot infer an output format"));
        assert!(!target.exists());
    }

    #[test]
    fn failed_jpeg_encode_leaves_no_file() {
        let dir = tempdir().expect("tempdir");
        let target = dir.path().join("too_wide.jpg");
        // Baseline JPEG caps each dimension at 65535 pixels.
        let wide = DynamicImage::ImageRgb8(RgbImage::new(65_536, 1));

        let err = save_image(&wide, &target, &OutputSettings::default()).unwrap_err();
        assert!(err.to_string().contains("failed to encode JPEG"));
        assert!(!target.exists());
    }
}
