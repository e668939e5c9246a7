// Copyright @yucwang 2023

use crate::core::rng::RenderRng;
use crate::math::constants::{ Float, Vector3f };
use crate::math::energy::Energy;

/// Outcome of sampling a material's scattering function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    pub direction: Vector3f,
    /// Attenuation applied to the path signal when following `direction`.
    pub strength: Energy,
    /// Diffuse bounces are eligible for direct light sampling.
    pub diffused: bool,
}

impl BsdfSample {
    pub fn new(direction: Vector3f, strength: Energy, diffused: bool) -> Self {
        Self { direction, strength, diffused }
    }

    pub fn absorbed(direction: Vector3f) -> Self {
        Self { direction, strength: Energy::zero(), diffused: false }
    }
}

pub trait Material: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn emit(&self) -> Energy;

    /// Base color weighting direct light at a diffuse bounce.
    fn color(&self) -> Energy;

    /// In `[0, 1]`.
    fn roughness(&self) -> Float;

    /// `normal` faces against `dir`. `distance` is the length of the segment
    /// that reached the surface.
    fn bsdf(&self, normal: &Vector3f, dir: &Vector3f, distance: Float, rng: &mut RenderRng) -> BsdfSample;
}
