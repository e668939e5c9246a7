// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};
use crate::core::rng::RenderRng;

use std::ops;

/// RGB radiance carried along a path. The same type doubles as a per-channel
/// weight (path signal, albedo).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Energy {
    rgb: Vector3f
}

impl Default for Energy {
    fn default() -> Self {
        Self { rgb: Vector3f::zeros() }
    }
}

impl Energy {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { rgb: Vector3f::new(r, g, b) }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn splat(v: Float) -> Self {
        Self::new(v, v, v)
    }

    /// Uniform attenuation by a scalar.
    pub fn amplified(&self, scale: Float) -> Self {
        Self { rgb: self.rgb * scale }
    }

    /// Per-channel attenuation.
    pub fn strength(&self, weight: &Energy) -> Self {
        Self { rgb: self.rgb.component_mul(&weight.rgb) }
    }

    /// `self + other * signal`, channel by channel.
    pub fn merged(&self, other: &Energy, signal: &Energy) -> Self {
        *self + other.strength(signal)
    }

    pub fn is_zero(&self) -> bool {
        self.rgb.iter().all(|c| *c <= 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.rgb.iter().all(|c| c.is_finite())
    }

    pub fn max_component(&self) -> Float {
        self.rgb.max()
    }

    pub fn luminance(&self) -> Float {
        0.2126 * self.rgb.x + 0.7152 * self.rgb.y + 0.0722 * self.rgb.z
    }

    /// Russian roulette. Survives with probability `min(1, max_component)`
    /// and is boosted by the inverse of that probability, so the expected
    /// value equals `self`.
    pub fn random_gain(&self, rng: &mut RenderRng) -> Self {
        let survival = self.max_component().min(1.0);
        if survival <= 0.0 || rng.next_f32() >= survival {
            return Self::zero();
        }
        self.amplified(1.0 / survival)
    }
}

impl ops::Add for Energy {
    type Output = Energy;

    fn add(self, rhs: Energy) -> Energy {
        Energy { rgb: self.rgb + rhs.rgb }
    }
}

impl ops::AddAssign for Energy {
    fn add_assign(&mut self, rhs: Energy) {
        self.rgb += rhs.rgb;
    }
}

impl ops::Index<usize> for Energy {
    type Output = Float;

    fn index(&self, idx: usize) -> &Float {
        &self.rgb[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::{Energy, Float};
    use crate::core::rng::RenderRng;
    use approx::assert_relative_eq;

    #[test]
    fn test_energy_arithmetic() {
        let a = Energy::new(1.0, 2.0, 3.0);
        let b = Energy::splat(0.5);

        assert_eq!(a + b, Energy::new(1.5, 2.5, 3.5));
        assert_eq!(a.amplified(2.0), Energy::new(2.0, 4.0, 6.0));
        assert_eq!(a.strength(&b), Energy::new(0.5, 1.0, 1.5));
        assert_eq!(Energy::zero().merged(&a, &b), Energy::new(0.5, 1.0, 1.5));
        assert_eq!(a[2], 3.0);
    }

    #[test]
    fn test_energy_zero_predicate() {
        assert!(Energy::zero().is_zero());
        assert!(!Energy::new(0.0, 0.0, 1e-6).is_zero());
    }

    #[test]
    fn test_energy_luminance_and_max() {
        let e = Energy::new(1.0, 1.0, 1.0);
        assert_relative_eq!(e.luminance(), 1.0, max_relative = 1e-5);
        assert_eq!(Energy::new(0.2, 0.9, 0.4).max_component(), 0.9);
        assert!(!Energy::new(1.0, Float::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn test_random_gain_of_zero_is_zero() {
        let mut rng = RenderRng::new(1);
        assert!(Energy::zero().random_gain(&mut rng).is_zero());
    }

    #[test]
    fn test_random_gain_keeps_bright_signals() {
        let mut rng = RenderRng::new(2);
        let signal = Energy::new(1.5, 0.2, 0.1);
        for _ in 0..100 {
            assert_eq!(signal.random_gain(&mut rng), signal);
        }
    }

    #[test]
    fn test_random_gain_is_unbiased() {
        let mut rng = RenderRng::new(1234);
        let signal = Energy::new(0.3, 0.15, 0.05);
        let trials = 200_000;
        let mut sum = Energy::zero();
        for _ in 0..trials {
            sum += signal.random_gain(&mut rng);
        }
        let mean = sum.amplified(1.0 / trials as f32);
        assert_relative_eq!(mean[0], signal[0], max_relative = 0.03);
        assert_relative_eq!(mean[1], signal[1], max_relative = 0.03);
        assert_relative_eq!(mean[2], signal[2], max_relative = 0.03);
    }
}
