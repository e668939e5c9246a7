// Copyright @yucwang 2026

use crate::core::environment::Environment;
use crate::core::error::SceneLoadError;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f, PI};
use crate::math::energy::Energy;
use image::io::Reader as ImageReader;
use image::GenericImageView;

/// Equirectangular environment image, `y` up, looked up with the nearest
/// texel.
pub struct EnvMap {
    image: Bitmap,
    scale: Float,
}

fn srgb_to_linear(v: Float) -> Float {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

impl EnvMap {
    pub fn new(image: Bitmap, scale: Float) -> Self {
        Self { image, scale }
    }

    /// Loads any format the `image` crate decodes. 8-bit images are treated
    /// as sRGB and linearised; float images (HDR, EXR) are taken as linear.
    pub fn from_file(path: &str, scale: Float) -> Result<Self, SceneLoadError> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let srgb = matches!(img.color(), image::ColorType::Rgb8 | image::ColorType::Rgba8
                                          | image::ColorType::L8 | image::ColorType::La8);

        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(SceneLoadError::Parse(format!("environment map {} is empty", path)));
        }

        let rgb = img.to_rgb32f();
        let mut bitmap = Bitmap::new(width as usize, height as usize);
        for (x, y, p) in rgb.enumerate_pixels() {
            let (mut r, mut g, mut b) = (p[0], p[1], p[2]);
            if srgb {
                r = srgb_to_linear(r);
                g = srgb_to_linear(g);
                b = srgb_to_linear(b);
            }
            bitmap[(x as usize, y as usize)] = Energy::new(r, g, b);
        }

        log::info!("Loaded environment map {} ({}x{}).", path, width, height);
        Ok(Self::new(bitmap, scale))
    }

    fn uv_from_direction(d: &Vector3f) -> Vector2f {
        let inv_two_pi = 1.0 / (2.0 * PI);
        let raw_u = d.x.atan2(-d.z) * inv_two_pi;
        let u = raw_u - raw_u.floor();
        let v = d.y.clamp(-1.0, 1.0).acos() * (1.0 / PI);
        Vector2f::new(u, v)
    }
}

impl Environment for EnvMap {
    fn radiance(&self, dir: &Vector3f) -> Energy {
        let len = dir.norm();
        if len <= 0.0 || self.image.width() == 0 || self.image.height() == 0 {
            return Energy::zero();
        }

        let uv = Self::uv_from_direction(&(dir / len));
        let x = ((uv.x * self.image.width() as Float) as usize).min(self.image.width() - 1);
        let y = ((uv.y * self.image.height() as Float) as usize).min(self.image.height() - 1);
        self.image[(x, y)].amplified(self.scale)
    }

    fn describe(&self) -> String {
        format!("EnvMap({}x{}, scale: {})", self.image.width(), self.image.height(), self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envmap_rows_follow_elevation() {
        let mut bitmap = Bitmap::new(4, 2);
        for x in 0..4 {
            bitmap[(x, 0)] = Energy::splat(2.0);
            bitmap[(x, 1)] = Energy::splat(0.5);
        }
        let env = EnvMap::new(bitmap, 2.0);

        assert_eq!(env.radiance(&Vector3f::new(0.0, 1.0, 0.0)), Energy::splat(4.0));
        assert_eq!(env.radiance(&Vector3f::new(0.0, -1.0, 0.0)), Energy::splat(1.0));
        assert_eq!(env.radiance(&Vector3f::zeros()), Energy::zero());
    }

    #[test]
    fn test_envmap_columns_follow_azimuth() {
        let mut bitmap = Bitmap::new(2, 1);
        bitmap[(0, 0)] = Energy::new(1.0, 0.0, 0.0);
        bitmap[(1, 0)] = Energy::new(0.0, 0.0, 1.0);
        let env = EnvMap::new(bitmap, 1.0);

        // atan2(x, -z): +x lands at u = 0.25, -x at u = 0.75.
        assert_eq!(env.radiance(&Vector3f::new(1.0, 0.0, 0.0)), Energy::new(1.0, 0.0, 0.0));
        assert_eq!(env.radiance(&Vector3f::new(-1.0, 0.0, 0.0)), Energy::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(EnvMap::from_file("/nonexistent/env.png", 1.0).is_err());
    }
}
