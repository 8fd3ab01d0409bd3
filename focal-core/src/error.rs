use std::path::PathBuf;

use thiserror::Error;

/// Failures the crop pipeline can report.
#[derive(Debug, Error)]
pub enum CropError {
    #[error("target dimensions must be positive, got {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },

    #[error("source image has zero width or height")]
    EmptyImage,

    #[error("failed to load face model {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },
}
