// Copyright 2020 @TwoCookingMice

use super::constants::{EPSILON, FLOAT_MAX, Float, Vector3f};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    pub min_t: Float,
    pub max_t: Float
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f,
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        Self { origin: o, dir: d.normalize(),
               min_t: min_t.unwrap_or(0.0),
               max_t: max_t.unwrap_or(FLOAT_MAX)}
    }

    /// Ray leaving a surface point. The segment starts at `EPSILON` so the
    /// surface it leaves is not hit again.
    pub fn spawn(o: Vector3f, d: Vector3f) -> Self {
        Self::new(o, d, Some(EPSILON), None)
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= self.min_t && t <= self.max_t
    }
}

#[cfg(test)]
mod tests {
    use super::{Ray3f, Vector3f};
    use crate::math::constants::EPSILON;

    #[test]
    fn test_ray3f_normalizes_direction() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let ray = Ray3f::new(o, Vector3f::new(1.0, 0.0, 1.0), None, None);
        assert_eq!(o, ray.origin());
        assert!((ray.dir().norm() - 1.0).abs() < 1e-6);

        let p = ray.at(std::f32::consts::SQRT_2);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
        assert!((p.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_spawned_ray_skips_origin() {
        let ray = Ray3f::spawn(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0));
        assert!(!ray.test_segment(0.0));
        assert!(ray.test_segment(EPSILON));
        assert!(ray.test_segment(1e6));
    }
}
