// Copyright @yucwang 2023

use crate::core::material::{BsdfSample, Material};
use crate::core::rng::RenderRng;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world};
use crate::math::constants::{ Float, Vector3f };
use crate::math::energy::Energy;
use crate::math::warp::sample_cosine_hemisphere;

pub struct LambertianDiffuse {
    color: Energy
}

impl LambertianDiffuse {
    pub fn new(rgb: Energy) -> Self {
        Self {
            color: rgb,
        }
    }
}

impl Material for LambertianDiffuse {
    fn emit(&self) -> Energy {
        Energy::zero()
    }

    fn color(&self) -> Energy {
        self.color
    }

    fn roughness(&self) -> Float {
        1.0
    }

    // Cosine-weighted sampling cancels the cosine and 1/pi of the BRDF,
    // leaving the albedo as the path weight.
    fn bsdf(&self, normal: &Vector3f, _dir: &Vector3f, _distance: Float, rng: &mut RenderRng) -> BsdfSample {
        let local = sample_cosine_hemisphere(&rng.next_2d());
        let (tangent, bitangent) = build_tangent_frame(normal);
        let direction = local_to_world(&local, &tangent, &bitangent, normal);

        BsdfSample::new(direction, self.color, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambertian_samples_upper_hemisphere() {
        let material = LambertianDiffuse::new(Energy::new(0.5, 0.25, 0.1));
        let normal = Vector3f::new(0.0, 1.0, 0.0);
        let dir = Vector3f::new(0.0, -1.0, 0.0);
        let mut rng = RenderRng::new(17);

        for _ in 0..1000 {
            let sample = material.bsdf(&normal, &dir, 1.0, &mut rng);
            assert!(sample.diffused);
            assert!(sample.direction.dot(&normal) >= -1e-5);
            assert!((sample.direction.norm() - 1.0).abs() < 1e-4);
            assert_eq!(sample.strength, Energy::new(0.5, 0.25, 0.1));
        }
        assert!(material.emit().is_zero());
        assert_eq!(material.roughness(), 1.0);
    }

    #[test]
    fn test_lambertian_mean_cosine() {
        // E[cos] under cosine-weighted sampling is 2/3.
        let material = LambertianDiffuse::new(Energy::splat(1.0));
        let normal = Vector3f::new(0.0, 0.0, 1.0);
        let mut rng = RenderRng::new(99);
        let n = 50_000;
        let mut sum = 0.0;
        for _ in 0..n {
            sum += material.bsdf(&normal, &-normal, 1.0, &mut rng).direction.z;
        }
        assert!((sum / n as Float - 2.0 / 3.0).abs() < 0.01);
    }
}
