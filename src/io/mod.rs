/* Copyright 2020 @TwoCookingMice */

pub mod collada;
pub mod exr_utils;
pub mod png_utils;

use crate::core::error::OutputError;
use crate::math::bitmap::Bitmap;

use std::path::Path;

/// Writes `bitmap` in the format named by the file extension: `.exr` keeps
/// linear values, `.png` is tone-clamped and gamma encoded.
pub fn write_bitmap(bitmap: &Bitmap, file_path: &str) -> Result<(), OutputError> {
    let ext = Path::new(file_path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "exr" => exr_utils::write_exr_to_file(bitmap, file_path),
        "png" => png_utils::write_png_to_file(bitmap, file_path),
        _ => Err(OutputError::UnsupportedFormat(ext)),
    }
}
