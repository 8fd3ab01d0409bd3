mod args;
mod config;

use anyhow::Result;
use clap::Parser;
use focal_core::{CropOptions, FocalCropper, LogObserver};
use focal_utils::{configure_telemetry, init_logging};
use log::info;

use crate::{
    args::CropArgs,
    config::{apply_cli_overrides, build_face_detector, load_settings},
};

fn main() -> Result<()> {
    init_logging(log::LevelFilter::Info)?;
    let args = CropArgs::parse();

    let mut settings = load_settings(args.config.as_ref())?;
    apply_cli_overrides(&mut settings, &args);
    configure_telemetry(
        settings.telemetry.enabled,
        settings.telemetry.level_filter(),
    );

    let face_detector = build_face_detector(&settings, args.model.as_deref())?;
    let cropper = FocalCropper::with_face_detector(settings, face_detector);

    let options = CropOptions {
        resize: !args.no_resize,
    };
    info!(
        "Cropping {} to {}x{}",
        args.image.display(),
        args.width,
        args.height
    );
    cropper.crop_file(
        &args.image,
        &args.output,
        args.target(),
        options,
        &mut LogObserver,
    )?;
    Ok(())
}
