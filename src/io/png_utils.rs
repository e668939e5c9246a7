// Copyright @yucwang 2026

use crate::core::error::OutputError;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;

use image::{Rgb, RgbImage};

pub const DISPLAY_GAMMA: Float = 2.2;

/// Linear value to an 8-bit display value: clamp to [0, 1], then gamma.
pub fn to_display_byte(v: Float) -> u8 {
    let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    (v.powf(1.0 / DISPLAY_GAMMA) * 255.0 + 0.5).floor().min(255.0) as u8
}

pub fn to_rgb_image(bitmap: &Bitmap) -> RgbImage {
    RgbImage::from_fn(bitmap.width() as u32, bitmap.height() as u32, |x, y| {
        let e = &bitmap[(x as usize, y as usize)];
        Rgb([to_display_byte(e[0]), to_display_byte(e[1]), to_display_byte(e[2])])
    })
}

pub fn write_png_to_file(bitmap: &Bitmap, file_path: &str) -> Result<(), OutputError> {
    log::info!("Starting writing png image: {}.", file_path);
    to_rgb_image(bitmap).save_with_format(file_path, image::ImageFormat::Png)?;
    log::info!("PNG written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::energy::Energy;

    #[test]
    fn test_display_bytes() {
        assert_eq!(to_display_byte(0.0), 0);
        assert_eq!(to_display_byte(1.0), 255);
        assert_eq!(to_display_byte(7.0), 255);
        assert_eq!(to_display_byte(-1.0), 0);
        assert_eq!(to_display_byte(Float::NAN), 0);
        // 0.5^(1/2.2) * 255 = 186.1
        assert_eq!(to_display_byte(0.5), 186);
    }

    #[test]
    fn test_rgb_image_layout() {
        let mut bitmap = Bitmap::new(2, 3);
        bitmap[(1, 2)] = Energy::new(1.0, 0.0, 1.0);
        let img = to_rgb_image(&bitmap);
        assert_eq!(img.dimensions(), (2, 3));
        assert_eq!(img.get_pixel(1, 2), &Rgb([255, 0, 255]));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }
}
