// Copyright @yucwang 2026

use crate::core::rng::RenderRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::Float;
use crate::math::energy::Energy;

pub trait Integrator: Sync {
    /// One stochastic radiance estimate for pixel `(x, y)`.
    fn trace_primary(&self, scene: &Scene, sensor: &dyn Sensor, x: Float, y: Float, rng: &mut RenderRng) -> Energy;
}
