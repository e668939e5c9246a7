// Copyright @yucwang 2026

use crate::core::environment::Environment;
use crate::math::constants::{Float, Vector3f};
use crate::math::energy::Energy;

/// Gradient sky: horizon to zenith above the horizon plane, flat ground
/// colour below it. `y` is up.
pub struct SkyEnvironment {
    horizon: Energy,
    zenith: Energy,
    ground: Energy,
}

impl SkyEnvironment {
    pub fn new(horizon: Energy, zenith: Energy, ground: Energy) -> Self {
        Self { horizon, zenith, ground }
    }
}

impl Default for SkyEnvironment {
    fn default() -> Self {
        Self::new(Energy::new(1.0, 1.0, 1.0),
                  Energy::new(0.5, 0.7, 1.0),
                  Energy::new(0.2, 0.2, 0.2))
    }
}

impl Environment for SkyEnvironment {
    fn radiance(&self, dir: &Vector3f) -> Energy {
        let len = dir.norm();
        if len <= 0.0 {
            return self.horizon;
        }

        let up: Float = dir.y / len;
        if up < 0.0 {
            return self.ground;
        }
        self.horizon.amplified(1.0 - up) + self.zenith.amplified(up)
    }

    fn describe(&self) -> String {
        format!("SkyEnvironment(horizon: {:?}, zenith: {:?}, ground: {:?})",
                self.horizon, self.zenith, self.ground)
    }
}
