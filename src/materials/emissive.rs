// Copyright @yucwang 2026

use crate::core::material::{BsdfSample, Material};
use crate::core::rng::RenderRng;
use crate::math::constants::{Float, Vector3f};
use crate::math::energy::Energy;

/// Light source surface. It emits and absorbs everything arriving at it.
pub struct Emissive {
    radiance: Energy,
}

impl Emissive {
    pub fn new(radiance: Energy) -> Self {
        Self { radiance }
    }
}

impl Material for Emissive {
    fn emit(&self) -> Energy {
        self.radiance
    }

    fn color(&self) -> Energy {
        Energy::zero()
    }

    fn roughness(&self) -> Float {
        1.0
    }

    fn bsdf(&self, normal: &Vector3f, _dir: &Vector3f, _distance: Float, _rng: &mut RenderRng) -> BsdfSample {
        BsdfSample::absorbed(*normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emissive_absorbs() {
        let light = Emissive::new(Energy::splat(4.0));
        let mut rng = RenderRng::new(0);
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let sample = light.bsdf(&n, &-n, 1.0, &mut rng);
        assert!(sample.strength.is_zero());
        assert!(!sample.diffused);
        assert_eq!(light.emit(), Energy::splat(4.0));
        assert!(light.color().is_zero());
    }
}
