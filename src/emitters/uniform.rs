// Copyright @yucwang 2026

use crate::core::environment::Environment;
use crate::math::constants::Vector3f;
use crate::math::energy::Energy;

/// Same radiance from every direction.
pub struct UniformEnvironment {
    radiance: Energy,
}

impl UniformEnvironment {
    pub fn new(radiance: Energy) -> Self {
        Self { radiance }
    }
}

impl Environment for UniformEnvironment {
    fn radiance(&self, _dir: &Vector3f) -> Energy {
        self.radiance
    }

    fn describe(&self) -> String {
        format!("UniformEnvironment({:?})", self.radiance)
    }
}
