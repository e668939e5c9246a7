// Copyright @yucwang 2026

use crate::core::rng::RenderRng;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::warp::sample_uniform_disk_concentric;

/// Look-at camera. A zero aperture gives a pinhole; otherwise rays start on
/// a lens disk and converge on the plane at `focus_distance`.
pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    aperture: Float,
    focus_distance: Float,
    width: usize,
    height: usize,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               width: usize,
               height: usize) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect: width as Float / height.max(1) as Float,
            aperture: 0.0,
            focus_distance: (target - origin).norm(),
            width,
            height,
        }
    }

    /// Thin-lens depth of field. `aperture` is the lens radius.
    pub fn with_lens(mut self, aperture: Float, focus_distance: Option<Float>) -> Self {
        self.aperture = aperture.max(0.0);
        if let Some(distance) = focus_distance {
            self.focus_distance = distance.max(0.0);
        }
        self
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    // Direction through film position (u, v) in [0, 1]^2, v growing downwards.
    fn film_direction(&self, u: Float, v: Float) -> Vector3f {
        let px = (2.0 * u - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * v) * self.tan_half_fov_y;
        (self.right * px + self.up * py + self.forward).normalize()
    }
}

impl Sensor for PerspectiveCamera {
    fn sample_ray(&self, x: Float, y: Float, rng: &mut RenderRng) -> Ray3f {
        let jitter = rng.next_2d();
        let u = (x + jitter.x) / self.width.max(1) as Float;
        let v = (y + jitter.y) / self.height.max(1) as Float;
        let dir = self.film_direction(u, v);

        if self.aperture <= 0.0 || self.focus_distance <= 0.0 {
            return Ray3f::new(self.origin, dir, None, None);
        }

        let focus_point = self.origin + dir * (self.focus_distance / dir.dot(&self.forward));
        let lens = sample_uniform_disk_concentric(&rng.next_2d()) * self.aperture;
        let lens_origin = self.origin + self.right * lens.x + self.up * lens.y;
        Ray3f::new(lens_origin, focus_point - lens_origin, None, None)
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera({}x{}, origin: {:?}, forward: {:?}, aperture: {})",
                self.width, self.height, self.origin, self.forward, self.aperture)
    }
}
