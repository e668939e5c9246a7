// Copyright @yucwang 2026

use super::constants::{Float, Vector3f, TWO_PI};
use super::ray::Ray3f;
use super::warp::{cone_solid_angle, sample_uniform_cone};
use crate::core::rng::RenderRng;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    center: Vector3f,
    radius: Float,
}

impl BoundingSphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { center, radius: radius.max(0.0) }
    }

    pub fn center(&self) -> Vector3f {
        self.center
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    /// Shadow ray from `point` toward a uniformly sampled direction of the
    /// cone the sphere subtends, together with that cone's solid angle.
    /// From inside the sphere the cone opens to a full hemisphere.
    pub fn shadow_ray(&self, point: &Vector3f, rng: &mut RenderRng) -> (Ray3f, Float) {
        let to_center = self.center - point;
        let dist2 = to_center.norm_squared();
        let axis = if dist2 > 0.0 {
            to_center / dist2.sqrt()
        } else {
            Vector3f::new(0.0, 0.0, 1.0)
        };

        let r2 = self.radius * self.radius;
        let cos_max = if dist2 <= r2 {
            0.0
        } else {
            (1.0 - r2 / dist2).max(0.0).sqrt()
        };

        let local = sample_uniform_cone(&rng.next_2d(), cos_max);
        let (tangent, bitangent) = build_tangent_frame(&axis);
        let dir = local_to_world(&local, &tangent, &bitangent, &axis);

        let solid_angle = cone_solid_angle(cos_max).clamp(0.0, TWO_PI);
        (Ray3f::spawn(*point, dir), solid_angle)
    }
}
