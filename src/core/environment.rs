// Copyright @yucwang 2026

use crate::math::constants::Vector3f;
use crate::math::energy::Energy;

/// Radiance arriving from infinitely far away along a direction.
pub trait Environment: Send + Sync {
    fn radiance(&self, dir: &Vector3f) -> Energy;
    fn describe(&self) -> String {
        String::from("Environment")
    }
}
