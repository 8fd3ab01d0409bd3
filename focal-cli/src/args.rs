//! Command-line argument definitions for focal-cli.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Crop an image to an exact size around its focal point (faces and corner features).
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct CropArgs {
    /// Output width in pixels.
    #[arg(short = 'W', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Output height in pixels.
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Source image to crop.
    #[arg(short, long)]
    pub image: PathBuf,

    /// Destination file; the format follows the extension.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Crop directly from the source without rescaling it first.
    #[arg(short, long = "no-resize", action = ArgAction::SetTrue)]
    pub no_resize: bool,

    /// Optional settings JSON (defaults to built-in parameters).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SeetaFace model file. Must exist when given; overrides the settings file.
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Enable telemetry timing logs (defaults to settings file).
    #[arg(long, action = ArgAction::SetTrue)]
    pub telemetry: bool,
}

impl CropArgs {
    pub fn target(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
