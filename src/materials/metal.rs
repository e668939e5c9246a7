// Copyright @yucwang 2026

use crate::core::material::{BsdfSample, Material};
use crate::core::rng::RenderRng;
use crate::core::tangent_frame::reflect;
use crate::math::constants::{Float, Vector3f};
use crate::math::energy::Energy;
use crate::math::warp::sample_unit_ball;

/// Conductor whose mirror lobe is blurred by `roughness`.
pub struct Metal {
    color: Energy,
    roughness: Float,
}

impl Metal {
    pub fn new(color: Energy, roughness: Float) -> Self {
        Self { color, roughness: roughness.clamp(0.0, 1.0) }
    }
}

impl Material for Metal {
    fn emit(&self) -> Energy {
        Energy::zero()
    }

    fn color(&self) -> Energy {
        self.color
    }

    fn roughness(&self) -> Float {
        self.roughness
    }

    fn bsdf(&self, normal: &Vector3f, dir: &Vector3f, _distance: Float, rng: &mut RenderRng) -> BsdfSample {
        let mirror = reflect(dir, normal);
        let fuzz = if self.roughness > 0.0 {
            sample_unit_ball(|| rng.next_f32()) * self.roughness
        } else {
            Vector3f::zeros()
        };

        let scattered = mirror + fuzz;
        if scattered.norm_squared() <= 0.0 || scattered.dot(normal) <= 0.0 {
            return BsdfSample::absorbed(mirror);
        }
        BsdfSample::new(scattered.normalize(), self.color, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_metal_is_a_mirror() {
        let metal = Metal::new(Energy::splat(0.9), 0.0);
        let mut rng = RenderRng::new(1);
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let dir = Vector3f::new(1.0, -1.0, 0.0).normalize();

        let sample = metal.bsdf(&n, &dir, 1.0, &mut rng);
        assert!(!sample.diffused);
        assert_eq!(sample.strength, Energy::splat(0.9));
        assert!((sample.direction - Vector3f::new(1.0, 1.0, 0.0).normalize()).norm() < 1e-5);
    }

    #[test]
    fn test_rough_metal_stays_above_surface() {
        let metal = Metal::new(Energy::splat(0.8), 1.0);
        let mut rng = RenderRng::new(8);
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let dir = Vector3f::new(0.3, 0.0, -1.0).normalize();

        for _ in 0..1000 {
            let sample = metal.bsdf(&n, &dir, 1.0, &mut rng);
            if !sample.strength.is_zero() {
                assert!(sample.direction.dot(&n) > 0.0);
            }
        }
        assert_eq!(metal.roughness(), 1.0);
    }
}
