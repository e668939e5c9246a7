// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::time::{SystemTime, UNIX_EPOCH};

const WORKER_STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random source owned by exactly one worker. It is `Send` but deliberately
/// not shared: every thread builds its own.
pub struct RenderRng {
    inner: Pcg32,
}

impl RenderRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: Pcg32::seed_from_u64(seed) }
    }

    /// Seed for worker `worker_id`. With a base seed the stream is
    /// reproducible, otherwise it is drawn from the wall clock.
    pub fn for_worker(base_seed: Option<u64>, worker_id: usize) -> Self {
        let base = base_seed.unwrap_or_else(time_seed);
        let offset = (worker_id as u64 + 1).wrapping_mul(WORKER_STREAM_STRIDE);
        Self::new(base ^ offset)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.inner.gen()
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> Float {
        self.inner.gen::<Float>()
    }

    pub fn next_2d(&mut self) -> Vector2f {
        Vector2f::new(self.next_f32(), self.next_f32())
    }

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    pub fn next_index(&mut self, n: usize) -> usize {
        self.inner.gen_range(0..n)
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
