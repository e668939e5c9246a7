// Copyright @yucwang 2026

use crate::core::rng::RenderRng;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;

pub trait Sensor: Sync {
    /// Primary ray through pixel `(x, y)`; `rng` drives pixel and lens jitter.
    fn sample_ray(&self, x: Float, y: Float, rng: &mut RenderRng) -> Ray3f;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
