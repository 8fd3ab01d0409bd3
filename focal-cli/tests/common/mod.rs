/// Common test utilities and macros for CLI integration tests
use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgb, RgbImage};

/// Write a synthetic photo-like image with a few high-contrast blocks to `dir`.
pub fn write_patterned_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let mut img = RgbImage::from_pixel(width, height, Rgb([50, 60, 70]));
    for (fx, fy) in [(0.2, 0.3), (0.6, 0.25), (0.4, 0.65)] {
        let x0 = (width as f64 * fx) as u32;
        let y0 = (height as f64 * fy) as u32;
        for y in y0..(y0 + height / 8).min(height) {
            for x in x0..(x0 + width / 8).min(width) {
                img.put_pixel(x, y, Rgb([230, 220, 200]));
            }
        }
    }
    let path = dir.join(name);
    DynamicImage::ImageRgb8(img)
        .save(&path)
        .expect("save input image");
    path
}

/// Macro to run the CLI with the given arguments.
///
/// Returns the Command output.
///
/// # Usage
///
/// ```ignore
/// let output = run_cli!(["-W", "200", "-H", "100", "-i", input, "-o", output]);
/// ```
#[macro_export]
macro_rules! run_cli {
    ([$($arg:expr),* $(,)?]) => {{
        std::process::Command::new(env!("CARGO_BIN_EXE_focal-cli"))
            .args([$(std::ffi::OsStr::new($arg),)*])
            .output()
            .expect("execute CLI")
    }};
}

/// Macro to assert CLI success and print stderr on failure.
///
/// # Usage
///
/// ```ignore
/// assert_cli_success!(output, "CLI should succeed");
/// ```
#[macro_export]
macro_rules! assert_cli_success {
    ($output:expr, $msg:literal) => {{
        if !$output.status.success() {
            eprintln!("CLI stderr: {}", String::from_utf8_lossy(&$output.stderr));
        }
        assert!($output.status.success(), $msg);
    }};
}
